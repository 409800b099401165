//! Order processing workflow with a success and a failure branch.
//!
//! Demonstrates:
//! - Implementing `Document` with `document_operations!`
//! - Routing events to steps, including a failure step
//! - Inspecting where a run stopped

use waypoint::prelude::*;

const PLACE_ORDER: StepName = StepName::from_static("PlaceOrder");
const CAPTURE_PAYMENT: StepName = StepName::from_static("CapturePayment");
const COMPLETE: StepName = StepName::from_static("Complete");
const FAIL: StepName = StepName::from_static("Fail");

#[derive(Debug)]
enum PaymentMethod {
    CreditCard { card_number: String },
    BankTransfer { account_number: String },
}

#[derive(Debug)]
struct Order {
    id: String,
    total_amount: f64,
    payment_method: PaymentMethod,
    status: String,
}

impl Order {
    fn new(id: &str, total_amount: f64, payment_method: PaymentMethod) -> Self {
        Self {
            id: id.to_string(),
            total_amount,
            payment_method,
            status: "Beginning".to_string(),
        }
    }

    fn new_order(&mut self) -> Event {
        println!("[{}] Opening order...", self.id);
        self.status = "Started".to_string();
        Event::START
    }

    fn place_order(&mut self) -> Event {
        println!("[{}] Placing order for {:.2}...", self.id, self.total_amount);
        self.status = "Ordered".to_string();
        Event::new("ordered")
    }

    fn capture_payment(&mut self) -> Event {
        match &self.payment_method {
            PaymentMethod::CreditCard { card_number } => {
                let last4 = &card_number[card_number.len().saturating_sub(4)..];
                println!("[{}] Charging card ending {}...", self.id, last4);
                self.status = "Paid".to_string();
                Event::new("paid")
            }
            PaymentMethod::BankTransfer { account_number } => {
                println!(
                    "[{}] Bank transfer from {} not authorized",
                    self.id, account_number
                );
                self.status = "Payment not authorized".to_string();
                Event::new("payment_failed")
            }
        }
    }
}

document_operations!(Order {
    "NewOrderHandler" => new_order,
    "PlaceOrderHandler" => place_order,
    "CapturePaymentHandler" => capture_payment,
});

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt::init();

    let workflow = Workflow::builder()
        .handler(StepName::NEW, "NewOrderHandler")
        .route(Event::START, PLACE_ORDER)
        .handler(PLACE_ORDER, "PlaceOrderHandler")
        .route("ordered", CAPTURE_PAYMENT)
        .handler(CAPTURE_PAYMENT, "CapturePaymentHandler")
        .route("paid", COMPLETE)
        .route("payment_failed", FAIL)
        .build();

    let orders = vec![
        Order::new(
            "ORD-001",
            149.90,
            PaymentMethod::CreditCard {
                card_number: "4111111111111111".to_string(),
            },
        ),
        Order::new(
            "ORD-002",
            75.00,
            PaymentMethod::BankTransfer {
                account_number: "DE89370400440532013000".to_string(),
            },
        ),
    ];

    for mut order in orders {
        workflow.verify_document(&order)?;
        let end = workflow.run(&mut order, StepName::NEW)?;

        if end == COMPLETE {
            println!("[{}] Completed with status '{}'", order.id, order.status);
        } else if end == FAIL {
            println!("[{}] Failed with status '{}'", order.id, order.status);
        } else {
            println!("[{}] Stopped at unexpected step '{}'", order.id, end);
        }
    }

    Ok(())
}
