//! Operator console: turns text lines typed during a paced run into loop
//! commands.
//!
//! Recognised lines (case-insensitive):
//!
//! ```text
//! fire | auto | manual | pause | resume | quit
//! speed <scale>
//! launch <x> <y> <z>      (target is the configured target point)
//! ```

use skyshield_core::commands::SimCommand;
use skyshield_core::enums::FireMode;
use skyshield_core::types::Position;

use crate::state::LoopCommand;

/// Parse one console line. `target` is where launched missiles aim.
/// Unknown or malformed input yields `None`.
pub fn parse_line(line: &str, target: Position) -> Option<LoopCommand> {
    let mut words = line.split_whitespace();
    let verb = words.next()?.to_ascii_lowercase();
    let args: Vec<&str> = words.collect();

    let command = match (verb.as_str(), args.as_slice()) {
        ("fire", []) => SimCommand::Fire,
        ("auto", []) => SimCommand::SetFireMode {
            mode: FireMode::Auto,
        },
        ("manual", []) => SimCommand::SetFireMode {
            mode: FireMode::Manual,
        },
        ("pause", []) => SimCommand::Pause,
        ("resume", []) => SimCommand::Resume,
        ("speed", [scale]) => SimCommand::SetTimeScale {
            scale: scale.parse().ok()?,
        },
        ("launch", [x, y, z]) => {
            let from = Position::new(x.parse().ok()?, y.parse().ok()?, z.parse().ok()?);
            if !from.is_finite() {
                return None;
            }
            SimCommand::LaunchMissile { from, target }
        }
        ("quit" | "exit", []) => return Some(LoopCommand::Shutdown),
        _ => return None,
    };
    Some(LoopCommand::Sim(command))
}
