/// Example: Project a point file with default parameters and print the result
///
/// Usage: cargo run --example project_points -- path/to/points.txt [a|b|c]

use std::env;
use std::io;
use std::process;

use lensview_core::{ParameterBus, Session, Variant, DEFAULT_QUIESCENCE};

fn main() -> io::Result<()> {
    let args: Vec<String> = env::args().collect();

    if args.len() < 2 {
        eprintln!("Usage: {} <points-file> [a|b|c]", args[0]);
        process::exit(2);
    }

    let variant = match args.get(2).map(|name| name.parse::<Variant>()) {
        Some(Ok(variant)) => variant,
        Some(Err(err)) => {
            eprintln!("{err}");
            process::exit(2);
        }
        None => Variant::Perspective,
    };

    let mut session = Session::new(variant);
    let count = session
        .load(&args[1])
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e.to_string()))?;
    eprintln!("Loaded {count} points, projecting with the {variant} model");

    // The bus snapshot before any edit holds every control's default.
    let defaults = ParameterBus::for_variant(variant, DEFAULT_QUIESCENCE).snapshot();
    let result = match session.apply(&defaults) {
        Ok(Some(result)) => result,
        Ok(None) => return Ok(()),
        Err(err) => {
            eprintln!("Projection failed: {err}");
            process::exit(1);
        }
    };

    for (i, point) in result.projected.iter().enumerate() {
        match &result.reference {
            Some(reference) => println!(
                "{} {} {} {}",
                point.x, point.y, reference[i].x, reference[i].y
            ),
            None => println!("{} {}", point.x, point.y),
        }
    }

    Ok(())
}
