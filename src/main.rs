//! Double Auction - demo binary
//!
//! Runs a handful of seeded rounds against a ledger and prints each receipt.
//! Set `RUST_LOG=debug` to see the per-stage events.

use std::process::ExitCode;

use double_auction::types::price::{balance_from_units, balance_to_string, from_fixed};
use double_auction::{
    AuctionConfig, AuctionEngine, Clearing, GeneratorConfig, InvariantTracker, Ledger, OrderSource,
    RandomOrderSource,
};

const SEED: u64 = 42;
const ROUNDS: usize = 5;

fn run() -> double_auction::Result<()> {
    let config = GeneratorConfig::default();
    let mut source = RandomOrderSource::seeded(SEED, config);
    // The tracker runs the conservation checks and keeps the totals
    let mut engine =
        AuctionEngine::with_config(AuctionConfig::default().with_invariant_checks(false));
    let mut tracker = InvariantTracker::new();

    let mut ledger = Ledger::new();
    let starting = balance_from_units(config.initial_balance);
    for id in 1..=(config.sellers + config.buyers) as u64 {
        ledger.open(id, starting)?;
    }

    println!("===========================================");
    println!("  Double Auction - seed {SEED}");
    println!("===========================================");

    for _ in 0..ROUNDS {
        let orders = ledger.prepare_round(source.next_round())?;
        let outcome = engine.run_round(orders)?;
        tracker.record(&outcome)?;
        ledger.apply(&outcome)?;

        println!();
        println!("Round {}", outcome.round_id);
        match &outcome.clearing {
            Clearing::Traded(result) => println!(
                "  Cleared {} units at sell {} / buy {} (marginal index {})",
                result.quantity,
                from_fixed(result.sell_price),
                from_fixed(result.buy_price),
                result.marginal_index
            ),
            Clearing::NoTrade(reason) => println!("  No trade: {reason:?}"),
        }
        for fill in &outcome.settlement.fills {
            println!(
                "    #{:<3} {:?} {:>5} @ {:>14}  Δ {}",
                fill.participant_id,
                fill.side,
                fill.quantity,
                from_fixed(fill.price),
                balance_to_string(fill.balance_delta)
            );
        }
        println!("  State root: {}", outcome.receipt.state_root_hex());
    }

    println!();
    println!("Balances after {} rounds:", tracker.rounds());
    for (id, balance) in ledger.iter() {
        println!("  #{id:<3} {}", balance_to_string(balance));
    }
    println!("Units traded: {}", tracker.traded());
    Ok(())
}

fn main() -> ExitCode {
    tracing_subscriber::fmt::init();

    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}
