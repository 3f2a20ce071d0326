//! Booking wizard state machine
//!
//! Walks a customer through
//! `PolicyAck -> ServiceChosen -> StylistChosen -> DateChosen -> SlotChosen
//! -> Paying -> Confirmed`. Each forward transition is gated by a guard
//! specific to the current step. Going back never clears later selections
//! except where they become invalid (e.g., changing stylist invalidates any
//! previously chosen slot, since it was computed against another stylist's
//! windows).

use chrono::{NaiveDate, NaiveDateTime};
use salonkit_domain::{
    AvailabilityWindow, BookableSlot, PendingReservation, Result, SalonError, Service,
    ServiceSelection,
};
use serde::{Deserialize, Serialize};

use super::saga::BookingRequest;
use crate::scheduling::compute_slots;

/// Steps of the booking wizard, in flow order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WizardStep {
    PolicyAck,
    ServiceChosen,
    StylistChosen,
    DateChosen,
    SlotChosen,
    Paying,
    Confirmed,
}

impl WizardStep {
    fn next(self) -> Option<Self> {
        match self {
            Self::PolicyAck => Some(Self::ServiceChosen),
            Self::ServiceChosen => Some(Self::StylistChosen),
            Self::StylistChosen => Some(Self::DateChosen),
            Self::DateChosen => Some(Self::SlotChosen),
            Self::SlotChosen => Some(Self::Paying),
            Self::Paying => Some(Self::Confirmed),
            Self::Confirmed => None,
        }
    }

    fn previous(self) -> Option<Self> {
        match self {
            Self::PolicyAck => None,
            Self::ServiceChosen => Some(Self::PolicyAck),
            Self::StylistChosen => Some(Self::ServiceChosen),
            Self::DateChosen => Some(Self::StylistChosen),
            Self::SlotChosen => Some(Self::DateChosen),
            Self::Paying => Some(Self::SlotChosen),
            Self::Confirmed => Some(Self::Paying),
        }
    }
}

/// Component-local state of one booking flow
#[derive(Debug, Clone)]
pub struct BookingWizard {
    step: WizardStep,
    policy_acknowledged: bool,
    selection: ServiceSelection,
    stylist_id: Option<String>,
    date: Option<NaiveDate>,
    slots: Vec<BookableSlot>,
    chosen_slot: Option<BookableSlot>,
    step_minutes: u32,
}

impl BookingWizard {
    /// Start a fresh wizard with the given slot granularity
    #[must_use]
    pub fn new(step_minutes: u32) -> Self {
        Self {
            step: WizardStep::PolicyAck,
            policy_acknowledged: false,
            selection: ServiceSelection::new(),
            stylist_id: None,
            date: None,
            slots: Vec::new(),
            chosen_slot: None,
            step_minutes,
        }
    }

    /// Current wizard step
    #[must_use]
    pub fn step(&self) -> WizardStep {
        self.step
    }

    /// The bookable slots computed for the current stylist/date/selection
    #[must_use]
    pub fn slots(&self) -> &[BookableSlot] {
        &self.slots
    }

    /// The currently chosen slot, if any
    #[must_use]
    pub fn chosen_slot(&self) -> Option<BookableSlot> {
        self.chosen_slot
    }

    /// The current service selection
    #[must_use]
    pub fn selection(&self) -> &ServiceSelection {
        &self.selection
    }

    /// Acknowledge the booking policy (guard for the first transition)
    pub fn acknowledge_policy(&mut self) {
        self.policy_acknowledged = true;
    }

    /// Select a service, replacing any prior selection
    ///
    /// The slot list was computed against the previous total duration, so it
    /// is invalidated and must be recomputed from fresh windows.
    pub fn select_service(&mut self, service: Service) {
        self.selection.select(service);
        self.invalidate_slots();
    }

    /// Select the stylist to book with
    ///
    /// Any previously chosen slot was computed against a different stylist's
    /// windows, so it is invalidated.
    pub fn select_stylist(&mut self, stylist_id: impl Into<String>) {
        self.stylist_id = Some(stylist_id.into());
        self.invalidate_slots();
    }

    /// Select the booking day
    pub fn select_date(&mut self, date: NaiveDate) {
        self.date = Some(date);
        self.invalidate_slots();
    }

    /// Load freshly fetched availability windows and recompute the slot list
    ///
    /// Always a full recompute, never an incremental patch. An empty service
    /// selection reports no slots rather than guessing a duration.
    ///
    /// # Errors
    /// Returns `SalonError::Validation` for malformed windows.
    pub fn load_windows(
        &mut self,
        windows: &[AvailabilityWindow],
        now: NaiveDateTime,
    ) -> Result<&[BookableSlot]> {
        self.chosen_slot = None;
        self.slots = compute_slots(windows, self.selection.total_duration(), now, self.step_minutes)?;
        Ok(&self.slots)
    }

    /// Choose one of the computed slots
    ///
    /// # Errors
    /// Returns `SalonError::InvalidInput` if the slot is not in the current
    /// slot list (stale or fabricated).
    pub fn choose_slot(&mut self, slot: BookableSlot) -> Result<()> {
        if !self.slots.contains(&slot) {
            return Err(SalonError::InvalidInput(format!(
                "slot {slot} is not among the bookable slots"
            )));
        }
        self.chosen_slot = Some(slot);
        Ok(())
    }

    /// Whether the guard for leaving the current step is satisfied
    #[must_use]
    pub fn can_proceed(&self) -> bool {
        match self.step {
            WizardStep::PolicyAck => self.policy_acknowledged,
            WizardStep::ServiceChosen => !self.selection.is_empty(),
            WizardStep::StylistChosen => self.stylist_id.is_some(),
            WizardStep::DateChosen => self.date.is_some() && self.chosen_slot.is_some(),
            WizardStep::SlotChosen => self.chosen_slot.is_some(),
            WizardStep::Paying => false, // resolved by the saga, not a guard
            WizardStep::Confirmed => false,
        }
    }

    /// Advance to the next step if the current guard passes
    ///
    /// # Errors
    /// Returns `SalonError::InvalidInput` if the guard is not satisfied or
    /// the wizard is already confirmed.
    pub fn advance(&mut self) -> Result<WizardStep> {
        if !self.can_proceed() {
            return Err(SalonError::InvalidInput(format!(
                "cannot proceed from step {:?}",
                self.step
            )));
        }
        let next = self
            .step
            .next()
            .ok_or_else(|| SalonError::InvalidInput("booking already confirmed".to_string()))?;
        self.step = next;
        Ok(self.step)
    }

    /// Step back without clearing later selections
    pub fn back(&mut self) {
        if let Some(previous) = self.step.previous() {
            self.step = previous;
        }
    }

    /// Mark the booking as confirmed (called after a successful saga run)
    pub fn mark_confirmed(&mut self) {
        self.step = WizardStep::Confirmed;
    }

    /// Drop back to slot selection after the backend rejected the slot
    pub fn reselect_slot(&mut self) {
        self.chosen_slot = None;
        self.step = WizardStep::DateChosen;
    }

    /// Build the booking request for the payment/reservation saga
    ///
    /// # Errors
    /// Returns `SalonError::InvalidInput` if any required choice is missing.
    pub fn booking_request(&self) -> Result<BookingRequest> {
        if self.selection.is_empty() {
            return Err(SalonError::InvalidInput("no service selected".to_string()));
        }
        let stylist_id = self
            .stylist_id
            .clone()
            .ok_or_else(|| SalonError::InvalidInput("no stylist selected".to_string()))?;
        let date =
            self.date.ok_or_else(|| SalonError::InvalidInput("no date selected".to_string()))?;
        let slot = self
            .chosen_slot
            .ok_or_else(|| SalonError::InvalidInput("no slot selected".to_string()))?;

        Ok(BookingRequest {
            service_ids: self.selection.service_ids(),
            stylist_id,
            date,
            start_time: slot.time(),
            total_amount: self.selection.total_price(),
        })
    }

    /// Snapshot the in-progress booking for a forced login detour
    #[must_use]
    pub fn snapshot(&self) -> PendingReservation {
        PendingReservation {
            service: self.selection.services().first().cloned(),
            stylist_id: self.stylist_id.clone(),
            date: self.date,
            start_time: self.chosen_slot.map(|slot| slot.time()),
        }
    }

    /// Restore a wizard from a pending-reservation snapshot
    ///
    /// The slot list is not restored: windows must be re-fetched and slots
    /// recomputed, since availability may have changed during the detour.
    #[must_use]
    pub fn resume(pending: PendingReservation, step_minutes: u32) -> Self {
        let mut wizard = Self::new(step_minutes);
        wizard.policy_acknowledged = true;
        if let Some(service) = pending.service {
            wizard.selection.select(service);
        }
        wizard.stylist_id = pending.stylist_id;
        wizard.date = pending.date;

        wizard.step = if wizard.selection.is_empty() {
            WizardStep::ServiceChosen
        } else if wizard.stylist_id.is_none() {
            WizardStep::StylistChosen
        } else {
            WizardStep::DateChosen
        };
        wizard
    }

    fn invalidate_slots(&mut self) {
        self.slots.clear();
        self.chosen_slot = None;
    }
}
