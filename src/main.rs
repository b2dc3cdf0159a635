//! Diagnostics for the magic bitboard tables.
//!
//! Usage: cargo run --release --bin diagnostics -- \
//!          --search-magics --seed 42 --square e4 --slider rook

use clap::{Parser, ValueEnum};

use magic_movegen::attacks::AttackGenerator;
use magic_movegen::bitboard::{
    algebraic_to_sq, sq_to_algebraic, to_display_string, to_hex, DIAGNOSTIC_CONSTANTS,
};
use magic_movegen::board::Board;
use magic_movegen::magic::{format_magics, DEFAULT_MAX_ATTEMPTS};
use magic_movegen::tables::{MagicSource, MagicTables};
use magic_movegen::types::{Color, Slider};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum SliderArg {
    Rook,
    Bishop,
}

impl From<SliderArg> for Slider {
    fn from(arg: SliderArg) -> Self {
        match arg {
            SliderArg::Rook => Slider::Rook,
            SliderArg::Bishop => Slider::Bishop,
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "diagnostics")]
#[command(about = "Print bitboard constants and inspect the magic attack tables")]
struct Args {
    /// Search for new magic numbers instead of using the shipped ones
    #[arg(long)]
    search_magics: bool,

    /// Seed for the magic search (random if not given)
    #[arg(long)]
    seed: Option<u64>,

    /// Candidates to try per square before giving up
    #[arg(long, default_value_t = DEFAULT_MAX_ATTEMPTS)]
    max_attempts: u64,

    /// Square to inspect, e.g. e4
    #[arg(long, value_parser = parse_square)]
    square: Option<u8>,

    /// Only inspect this slider family
    #[arg(long, value_enum)]
    slider: Option<SliderArg>,
}

fn parse_square(s: &str) -> Result<u8, String> {
    algebraic_to_sq(s)
        .or_else(|| s.parse::<u8>().ok().filter(|&sq| sq < 64))
        .ok_or_else(|| format!("`{s}` is not a square (use e.g. `e4` or 0-63)"))
}

fn print_constants() {
    for (name, bb) in DIAGNOSTIC_CONSTANTS {
        println!("{name} ({})", to_hex(bb));
        println!("{}\n", to_display_string(bb));
    }
}

fn print_square(tables: &MagicTables, sq: u8, slider: Slider) {
    let mask = tables.masks().get(sq, slider);
    let attacks = tables.attacks(sq, slider, 0);
    println!(
        "{} on {}: magic {}, {} relevant squares",
        slider,
        sq_to_algebraic(sq),
        to_hex(tables.magics(slider)[sq as usize]),
        mask.count_ones()
    );
    println!("relevant occupancy:\n{}\n", to_display_string(mask));
    println!("attacks on an empty board:\n{}\n", to_display_string(attacks));
}

fn print_start_position(tables: &MagicTables) {
    let board = Board::new();
    let gen = AttackGenerator::new(tables, &board);
    println!("{board}");
    for color in Color::ALL {
        println!(
            "{}: {} pawn pushes, {} double pushes, {} knight moves",
            color.to_human(),
            gen.pawn_pushes(color).count_ones(),
            gen.pawn_double_pushes(color).count_ones(),
            gen.knights(color).count_ones()
        );
    }
    println!();
}

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    let args = Args::parse();

    print_constants();

    let source = if args.search_magics {
        MagicSource::Search {
            seed: args.seed,
            max_attempts: args.max_attempts,
        }
    } else {
        MagicSource::Precomputed
    };
    let tables = MagicTables::build(&source)?;

    print_start_position(&tables);

    let sliders: Vec<Slider> = match args.slider {
        Some(slider) => vec![slider.into()],
        None => Slider::ALL.to_vec(),
    };

    if let Some(sq) = args.square {
        for &slider in &sliders {
            print_square(&tables, sq, slider);
        }
    }

    if args.search_magics {
        for &slider in &sliders {
            let name = match slider {
                Slider::Rook => "ROOK_MAGICS",
                Slider::Bishop => "BISHOP_MAGICS",
            };
            println!("{}", format_magics(name, tables.magics(slider)));
        }
    }

    Ok(())
}
