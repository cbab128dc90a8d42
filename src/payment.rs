use crate::models::ClubEvent;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// Simulated checkout: fee breakdown plus a linear progress machine. There
/// is no gateway behind this; `processing` always resolves to `success`.
/// `Failed` exists as a terminal state for completeness but nothing in the
/// simulation routes to it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PaymentMethod {
    Upi,
    Card,
    Wallet,
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PaymentMethod::Upi => write!(f, "UPI"),
            PaymentMethod::Card => write!(f, "Card"),
            PaymentMethod::Wallet => write!(f, "Wallet"),
        }
    }
}

/// What the user is asked to confirm: base fee from the event's fee string,
/// a 2% platform fee rounded to the nearest rupee, and the payable total.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentIntent {
    pub event_id: String,
    pub event_title: String,
    pub base_fee: u32,
    pub platform_fee: u32,
    pub total: u32,
}

impl PaymentIntent {
    pub fn for_event(event: &ClubEvent) -> PaymentIntent {
        let base_fee = event.fee_amount();
        let platform_fee = (f64::from(base_fee) * 0.02).round() as u32;
        PaymentIntent {
            event_id: event.id.clone(),
            event_title: event.title.clone(),
            base_fee,
            platform_fee,
            total: base_fee + platform_fee,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaymentStep {
    Summary,
    Method,
    Processing,
    Success,
    Failed,
}

const PROGRESS_STEP: u8 = 2;
pub const TICK_INTERVAL: Duration = Duration::from_millis(50);

#[derive(Debug, Clone)]
pub struct PaymentFlow {
    intent: PaymentIntent,
    step: PaymentStep,
    method: PaymentMethod,
    progress: u8,
}

impl PaymentFlow {
    pub fn new(intent: PaymentIntent) -> PaymentFlow {
        PaymentFlow {
            intent,
            step: PaymentStep::Summary,
            method: PaymentMethod::Upi,
            progress: 0,
        }
    }

    pub fn intent(&self) -> &PaymentIntent {
        &self.intent
    }

    pub fn step(&self) -> PaymentStep {
        self.step
    }

    pub fn method(&self) -> PaymentMethod {
        self.method
    }

    /// Monotonic 0..=100.
    pub fn progress(&self) -> u8 {
        self.progress
    }

    pub fn choose_method(&mut self, method: PaymentMethod) {
        if matches!(self.step, PaymentStep::Summary | PaymentStep::Method) {
            self.method = method;
            self.step = PaymentStep::Method;
        }
    }

    pub fn pay(&mut self) {
        if matches!(self.step, PaymentStep::Summary | PaymentStep::Method) {
            self.step = PaymentStep::Processing;
            self.progress = 0;
        }
    }

    /// One simulated timer firing. Returns the step after the tick.
    pub fn tick(&mut self) -> PaymentStep {
        if self.step == PaymentStep::Processing {
            self.progress = self.progress.saturating_add(PROGRESS_STEP).min(100);
            if self.progress >= 100 {
                self.step = PaymentStep::Success;
            }
        }
        self.step
    }

    /// Terminal failure. The simulation never routes here; kept so a real
    /// gateway integration has somewhere to land.
    pub fn fail(&mut self) {
        if self.step == PaymentStep::Processing {
            self.step = PaymentStep::Failed;
        }
    }

    pub fn is_settled(&self) -> bool {
        matches!(self.step, PaymentStep::Success | PaymentStep::Failed)
    }

    /// Drive the progress timer to completion, sleeping one tick interval
    /// per step like the checkout's progress ring.
    pub async fn process(&mut self) -> PaymentStep {
        self.pay();
        while self.step == PaymentStep::Processing {
            tokio::time::sleep(TICK_INTERVAL).await;
            self.tick();
        }
        self.step
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn intent() -> PaymentIntent {
        PaymentIntent {
            event_id: "e2".into(),
            event_title: "RoboWars 2023".into(),
            base_fee: 200,
            platform_fee: 4,
            total: 204,
        }
    }

    #[test]
    fn platform_fee_is_two_percent_rounded() {
        let event = crate::seed::demo_state().events.get("e2").cloned().unwrap();
        let intent = PaymentIntent::for_event(&event);
        assert_eq!(intent.base_fee, 200);
        assert_eq!(intent.platform_fee, 4);
        assert_eq!(intent.total, 204);
    }

    #[test]
    fn processing_resolves_to_success_monotonically() {
        let mut flow = PaymentFlow::new(intent());
        flow.choose_method(PaymentMethod::Card);
        flow.pay();
        let mut last = 0;
        let mut ticks = 0;
        while flow.step() == PaymentStep::Processing {
            flow.tick();
            assert!(flow.progress() >= last);
            last = flow.progress();
            ticks += 1;
            assert!(ticks <= 100, "progress must terminate");
        }
        assert_eq!(flow.step(), PaymentStep::Success);
        assert_eq!(flow.progress(), 100);
        assert_eq!(flow.method(), PaymentMethod::Card);
    }

    #[test]
    fn method_is_locked_once_processing() {
        let mut flow = PaymentFlow::new(intent());
        flow.pay();
        flow.choose_method(PaymentMethod::Wallet);
        assert_eq!(flow.method(), PaymentMethod::Upi);
    }

    #[test]
    fn failed_is_terminal() {
        let mut flow = PaymentFlow::new(intent());
        flow.pay();
        flow.fail();
        assert_eq!(flow.step(), PaymentStep::Failed);
        assert!(flow.is_settled());
        flow.tick();
        assert_eq!(flow.step(), PaymentStep::Failed);
    }

    #[tokio::test(start_paused = true)]
    async fn async_driver_reaches_success() {
        let mut flow = PaymentFlow::new(intent());
        assert_eq!(flow.process().await, PaymentStep::Success);
    }
}
