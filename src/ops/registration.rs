use crate::error::{AppError, AppResult};
use crate::models::{
    NotificationKind, Registration, RegistrationStatus, Ticket, Transaction, TransactionStatus,
};
use crate::payment::{PaymentIntent, PaymentMethod};
use crate::store::AppState;
use chrono::{DateTime, Utc};
use rand::Rng;
use tracing::info;

/// What pressing RSVP produced.
#[derive(Debug, Clone)]
pub enum RsvpOutcome {
    /// Already registered; the existing ticket is surfaced instead of a
    /// second registration.
    ExistingTicket(Ticket),
    /// Free event, registered on the spot.
    Registered(Ticket),
    /// Paid event; the caller must run the payment sub-flow and then call
    /// [`complete_payment`].
    PaymentRequired(PaymentIntent),
}

/// The NotRegistered → Registered transition for the session user. `now`
/// is passed in so the deadline guard is checkable without a wall clock.
pub fn rsvp(state: &mut AppState, event_id: &str, now: DateTime<Utc>) -> AppResult<RsvpOutcome> {
    let event = state
        .events
        .get(event_id)
        .ok_or(AppError::NotFound("event"))?
        .clone();
    let user = state.current_user().ok_or(AppError::NotFound("session user"))?;

    if user.is_registered_for(event_id) {
        let txn_id = user.transaction_for(event_id).map(|t| t.id.clone());
        return Ok(RsvpOutcome::ExistingTicket(Ticket::issue(
            &event,
            user,
            txn_id.as_deref(),
        )));
    }

    if !event.registration_open(now) {
        return Err(AppError::RegistrationClosed);
    }

    if event.is_paid() {
        return Ok(RsvpOutcome::PaymentRequired(PaymentIntent::for_event(&event)));
    }

    // free path: no transaction, straight to registered
    let user = state
        .current_user_mut()
        .ok_or(AppError::NotFound("session user"))?;
    user.registered_events.push(Registration {
        event_id: event_id.to_owned(),
        status: RegistrationStatus::Registered,
    });
    let ticket = Ticket::issue(&event, user, None);
    state.push_notification(
        "Registration Confirmed",
        "Registered Successfully! Reminder set.",
        NotificationKind::Success,
    );
    info!(event_id, "registered for free event");
    Ok(RsvpOutcome::Registered(ticket))
}

/// Success handler for the payment sub-flow: record the transaction, record
/// the registration (exactly once), and hand back the ticket keyed by the
/// new transaction id.
pub fn complete_payment(
    state: &mut AppState,
    event_id: &str,
    method: PaymentMethod,
    now: DateTime<Utc>,
) -> AppResult<(Transaction, Ticket)> {
    let event = state
        .events
        .get(event_id)
        .ok_or(AppError::NotFound("event"))?
        .clone();
    let transaction = Transaction {
        id: new_transaction_id(now),
        event_id: event.id.clone(),
        event_name: event.title.clone(),
        amount: event.fee.clone().unwrap_or_else(|| "0".into()),
        date: now,
        status: TransactionStatus::Success,
        payment_method: method.to_string(),
    };

    let user = state
        .current_user_mut()
        .ok_or(AppError::NotFound("session user"))?;
    if !user.is_registered_for(event_id) {
        user.registered_events.push(Registration {
            event_id: event_id.to_owned(),
            status: RegistrationStatus::Registered,
        });
    }
    user.transactions.push(transaction.clone());
    let ticket = Ticket::issue(&event, user, Some(&transaction.id));

    state.push_notification(
        "Payment Successful",
        "Payment Successful! Ticket generated.",
        NotificationKind::Success,
    );
    info!(event_id, transaction_id = %transaction.id, "paid registration recorded");
    Ok((transaction, ticket))
}

fn new_transaction_id(now: DateTime<Utc>) -> String {
    let suffix: u32 = rand::thread_rng().gen_range(0..1000);
    format!("TXN_{}_{}", now.timestamp_millis(), suffix)
}
