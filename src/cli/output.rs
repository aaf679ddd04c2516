use ansi_term::Colour::{Green, Red};

use crate::timelog::summary::Saldo;

/// Prints the appended summary, highlighting the saldo.
pub fn print_summary(summary: &str, saldo: &Saldo) {
    let saldo_line = saldo.to_string();
    for line in summary.trim_start().lines() {
        if line == saldo_line {
            let colour = if saldo.negative { Red } else { Green };
            println!("{}", colour.paint(line));
        } else {
            println!("{line}");
        }
    }
}
