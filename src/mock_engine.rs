use std::io::{self, BufRead, Write};

use clap::Parser;

const OPENING: [&str; 10] = [
    "e2e4", "e7e5", "g1f3", "b8c6", "f1b5", "a7a6", "b5a4", "g8f6", "e1g1", "f8e7",
];

/// Scripted UCI engine used by the integration tests.
#[derive(Parser, Debug)]
struct Args {
    /// Exit instead of searching once the position holds this many moves
    #[arg(long)]
    plies: Option<usize>,

    /// Print the banner, then never answer anything
    #[arg(long)]
    mute: bool,

    /// Follow the banner with a line that is not valid UTF-8
    #[arg(long)]
    garbage: bool,

    /// Answer the first search with a bare `bestmove`
    #[arg(long)]
    stutter: bool,
}

fn main() {
    let args = Args::parse();
    let stdin = io::stdin();
    let mut stdout = io::stdout();

    println!("MockEngine 1.0");
    println!("scripted replies, no search");
    if args.garbage {
        let _ = stdout.write_all(b"\xff\xfe\n");
    }
    let _ = stdout.flush();

    let mut ply = 0;
    let mut stuttered = false;

    for line in stdin.lock().lines() {
        let Ok(cmd) = line else { break };
        let parts: Vec<&str> = cmd.split_whitespace().collect();
        if parts.is_empty() || args.mute {
            continue;
        }

        match parts[0] {
            "uci" => {
                println!("id name MockEngine 1.0");
                println!("id author uci-bench");
                println!("uciok");
            },
            "isready" => println!("readyok"),
            "position" => {
                ply = parts.iter().position(|p| *p == "moves").map_or(0, |i| parts.len() - i - 1);
            },
            "go" => {
                if args.plies.is_some_and(|limit| ply >= limit) {
                    break;
                }
                if args.stutter && !stuttered {
                    stuttered = true;
                    println!("bestmove");
                    let _ = stdout.flush();
                    continue;
                }
                let mv = OPENING[ply % OPENING.len()];
                let reply = OPENING[(ply + 1) % OPENING.len()];
                for depth in 1..=3 {
                    println!("info depth {} nodes {} score cp 10 pv {}", depth, depth * 100, mv);
                }
                if ply % 2 == 0 {
                    println!("bestmove {} ponder {}", mv, reply);
                } else {
                    println!("bestmove {}", mv);
                }
            },
            "quit" => break,
            _ => {}
        }
        let _ = stdout.flush();
    }
}
