//! Example walking through the full lesson lifecycle.
//!
//! This example shows how to use the service layer to:
//! 1. Publish a teacher's weekly availability
//! 2. Browse the student-facing calendar
//! 3. Check out a cart of lessons through the payment gateway
//! 4. Cancel a booking and watch the seat free up
//!
//! To run this example:
//! ```bash
//! cargo run --example publish_and_book
//! ```

use cadenza::checkout::SimulatedGateway;
use cadenza::db::{services, LocalRepository, PricingConfig};
use cadenza::models::{RecurrenceRule, SlotTime, StudentId, TeacherId, WeekdaySet};
use chrono::NaiveDate;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("=== Cadenza Booking Walkthrough ===\n");

    let repo = LocalRepository::new();
    let gateway = SimulatedGateway::new();
    let pricing = PricingConfig::default();

    let teacher = TeacherId::from("teacher-ana");
    let student = StudentId::from("student-bo");

    // Step 1: Publish availability
    println!("1. Publishing weekly availability...");
    let rule = RecurrenceRule::weekly(
        NaiveDate::from_ymd_opt(2025, 6, 2).unwrap(),
        NaiveDate::from_ymd_opt(2025, 6, 13).unwrap(),
        SlotTime::new(14, 0).unwrap(),
        60,
        WeekdaySet::from_indices(&[1, 3])?, // Mondays and Wednesdays
        2,
    );
    let outcome = services::publish_availability(&repo, &teacher, &rule).await?;
    println!(
        "   Published {} slots ({} refused by storage)\n",
        outcome.created.len(),
        outcome.failed.len()
    );

    // Step 2: Browse availability as a student
    println!("2. Browsing open lessons...");
    let calendar = services::student_availability(&repo).await?;
    for (date, slots) in &calendar {
        for slot in slots {
            println!(
                "   {} at {} with {} ({} seats)",
                date,
                slot.time,
                slot.owner,
                slot.seats_left()
            );
        }
    }
    println!();

    // Step 3: Check out the first two lessons
    println!("3. Checking out two lessons...");
    let cart: Vec<_> = outcome.created.iter().take(2).map(|s| s.id).collect();
    let checkout = services::checkout_cart(&repo, &gateway, &pricing, &student, &cart).await?;
    println!(
        "   Charged {} cents, receipt {}",
        checkout.receipt.amount_cents, checkout.receipt.reference
    );
    for booking in &checkout.bookings {
        println!(
            "   Booked lesson {} on {} at {}",
            booking.slot_id, booking.date, booking.time
        );
    }
    println!();

    // Step 4: Cancel one booking
    println!("4. Cancelling the first booking...");
    let cancelled = services::cancel_booking(&repo, &student, checkout.bookings[0].id).await?;
    println!(
        "   Booking {} is now {:?}; its lesson is open again\n",
        cancelled.id, cancelled.status
    );

    let calendar = services::student_availability(&repo).await?;
    println!(
        "   {} days with open lessons remain",
        calendar.len()
    );

    println!("\n=== Walkthrough Complete ===");
    Ok(())
}
