// Simple command-line application to play chess against the search policy

use chessmove::{
    board::PrettyStyle, policy::SearchReply, Color, MoveService, Position, Status,
};
use std::io::{self, BufRead, Write};

fn main() {
    let mut stdin = io::stdin().lock();

    let service = MoveService::with_policy(SearchReply::default());
    let mut fen = Position::initial().as_fen();

    loop {
        let position = Position::from_fen(&fen).unwrap();
        let status = position.calc_status();
        if status.is_terminal() {
            println!("{}", position.pretty(PrettyStyle::Utf8));
            println!("Game finished: {}", status);
            println!("Final position: {}", fen);
            break;
        }

        println!("{}", position.pretty(PrettyStyle::Utf8));
        if status == Status::Check {
            println!("Check!");
        }
        let side = match position.side() {
            Color::White => "White",
            Color::Black => "Black",
        };
        print!("{} move ({}): ", side, position.fullmove_number());
        io::stdout().flush().unwrap();
        let mut s = String::new();
        if stdin.read_line(&mut s).unwrap() == 0 {
            break;
        }

        // The service does everything at once: it validates our move, applies it and
        // replies for the opponent.
        match service.make_move(&fen, &s) {
            Ok(res) => {
                if res.mv != s.trim().to_ascii_lowercase() {
                    println!("Reply: {}", res.mv);
                }
                fen = res.fen;
            }
            Err(e) => println!("Bad move: {} ({:?})", e, e.kind()),
        }

        println!();
    }
}
