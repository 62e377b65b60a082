//! City name input from the console

use std::io::BufRead;
use tracing::debug;

/// Read one line and return the trimmed city name.
///
/// Returns `Ok(None)` on end of input or when the line is blank; the caller
/// treats that as "no city provided" and stops without re-prompting.
pub fn read_city<R: BufRead>(mut reader: R) -> std::io::Result<Option<String>> {
    let mut line = String::new();
    let read = reader.read_line(&mut line)?;
    if read == 0 {
        debug!("Console input closed before a city was entered");
        return Ok(None);
    }

    let city = line.trim();
    if city.is_empty() {
        return Ok(None);
    }

    Ok(Some(city.to_string()))
}
