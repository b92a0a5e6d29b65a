pub mod pairs;
pub mod quiz;

pub struct GameDescriptor
{
    pub name: &'static str,
    pub description: &'static str,
}

pub fn registry() -> Vec<GameDescriptor>
{
    vec![
        GameDescriptor {
            name: "pairs",
            description: "Flip cards to find matching flags",
        },
        GameDescriptor {
            name: "quiz",
            description: "Drag flags onto their countries before time runs out",
        },
    ]
}

/// Reads `--flag value` or `--flag=value`. `Ok(None)` means `arg` is some
/// other option.
pub fn option_value<'a>(
    arg: &str,
    flag: &str,
    rest: &mut impl Iterator<Item = &'a String>,
) -> Result<Option<String>, String>
{
    if arg == flag {
        return rest
            .next()
            .cloned()
            .map(Some)
            .ok_or_else(|| format!("Expected value after {flag}"));
    }
    Ok(arg
        .strip_prefix(flag)
        .and_then(|tail| tail.strip_prefix('='))
        .map(str::to_string))
}
