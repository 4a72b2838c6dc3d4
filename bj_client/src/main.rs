//! Console blackjack client.
//!
//! A blocking prompt loop over the `blackjack` engine: show hands, ask the
//! player to hit or stand, narrate the dealer's turn, announce the winner,
//! and offer another round. Pass `--seed` to deal from a seeded RNG for a
//! reproducible session.

use anyhow::Result;
use blackjack::{Outcome, Phase, PlayerAction, Round};
use pico_args::Arguments;
use rand::{RngCore, SeedableRng, rngs::StdRng};
use std::io::{self, Write};

const HELP: &str = "\
Play blackjack in the console (dealer wins ties)

USAGE:
  bj_client [OPTIONS]

OPTIONS:
  --seed N              Seed the shuffle RNG for a reproducible session

FLAGS:
  -h, --help            Print help information
";

fn main() -> Result<()> {
    let mut pargs = Arguments::from_env();

    if pargs.contains(["-h", "--help"]) {
        print!("{HELP}");
        std::process::exit(0);
    }

    let seed: Option<u64> = pargs.opt_value_from_str("--seed")?;
    let mut rng: Box<dyn RngCore> = match seed {
        Some(seed) => Box::new(StdRng::seed_from_u64(seed)),
        None => Box::new(rand::rng()),
    };

    println!("Welcome to Blackjack! (Dealer wins ties)");
    loop {
        play_round(rng.as_mut())?;
        let again = prompt("\nPlay again? [Y/N]: ")?.to_lowercase();
        if !matches!(again.as_str(), "y" | "yes") {
            println!("Thanks for playing!");
            break;
        }
    }
    Ok(())
}

fn play_round(rng: &mut dyn RngCore) -> Result<()> {
    let mut round = Round::start(rng)?;

    println!("\n=== New Round ===");
    println!("Dealer shows: {}", round.render_dealer_hand(false));

    // Player turn: hit until bust or stand.
    loop {
        println!(
            "\nYour hand: {} (value: {})",
            round.render_player_hand(),
            round.player().value()
        );
        match prompt("Hit or Stand? [H/S]: ")?.to_lowercase().as_str() {
            "h" | "hit" => {
                round.apply_player_action(PlayerAction::Hit)?;
                if let Some(card) = round.player().cards().last() {
                    println!(
                        "You drew: {card}. Hand value is now {}.",
                        round.player().value()
                    );
                }
                if round.phase() == Phase::Resolved {
                    println!("You busted!");
                    break;
                }
            }
            "s" | "stand" => {
                round.apply_player_action(PlayerAction::Stand)?;
                break;
            }
            _ => println!("Please type 'H' to Hit or 'S' to Stand."),
        }
    }

    // Dealer turn, skipped when the player busted.
    if round.phase() == Phase::DealerTurn {
        if let Some(hole) = round.dealer().cards().get(1) {
            println!("\nDealer reveals hole card: {hole}");
        }
        let dealt = round.dealer().len();
        round.advance_dealer()?;
        for card in &round.dealer().cards()[dealt..] {
            println!("Dealer hits and draws: {card}");
        }
        println!(
            "Dealer's hand: {} (value: {})",
            round.render_dealer_hand(true),
            round.dealer().value()
        );
        if round.dealer().is_busted() {
            println!("Dealer busts!");
        } else {
            println!("Dealer stands.");
        }
    }

    println!("\n=== Results ===");
    println!(
        "Your hand:   {} (value: {})",
        round.render_player_hand(),
        round.player().value()
    );
    println!(
        "Dealer hand: {} (value: {})",
        round.render_dealer_hand(true),
        round.dealer().value()
    );
    match round.outcome()? {
        Outcome::PlayerWins => println!("You win!"),
        Outcome::DealerWins => println!("Dealer wins! (Dealer wins ties)"),
    }
    Ok(())
}

fn prompt(message: &str) -> Result<String> {
    print!("{message}");
    io::stdout().flush()?;
    let mut input = String::new();
    io::stdin().read_line(&mut input)?;
    Ok(input.trim().to_string())
}
