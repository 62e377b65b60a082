//! Streaming text fragments produced by the model
//!
//! The generator side is a plain `Iterator<Item = Result<String, E>>`; it is
//! lazy, finite and cannot be restarted. Consumers fold it with
//! [`collect_suggestion`] or read it fragment by fragment.

use std::mem;

/// Iterator adapter that ends the stream at the first occurrence of a stop
/// sequence.
///
/// Text before the stop sequence is passed through; the stop sequence and
/// everything after it is dropped. A trailing partial match is held back
/// until the next fragment shows whether it completes the stop sequence, so
/// a yielded fragment never contains part of it. Once the stop sequence is
/// seen the inner iterator is not polled again.
pub struct StopAt<I> {
    inner: I,
    stop: String,
    pending: String,
    done: bool,
}

impl<I> StopAt<I> {
    pub fn new(inner: I, stop: impl Into<String>) -> Self {
        Self {
            inner,
            stop: stop.into(),
            pending: String::new(),
            done: false,
        }
    }

    /// Length of the longest suffix of `pending` that is a proper prefix of `stop`
    fn partial_match_len(&self) -> usize {
        (1..self.stop.len())
            .rev()
            .filter(|&len| self.stop.is_char_boundary(len))
            .find(|&len| self.pending.ends_with(&self.stop[..len]))
            .unwrap_or(0)
    }

    fn take_pending(&mut self) -> Option<String> {
        if self.pending.is_empty() {
            None
        } else {
            Some(mem::take(&mut self.pending))
        }
    }
}

impl<I, E> Iterator for StopAt<I>
where
    I: Iterator<Item = Result<String, E>>,
{
    type Item = Result<String, E>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        if self.stop.is_empty() {
            return self.inner.next();
        }

        loop {
            let fragment = match self.inner.next() {
                Some(Ok(fragment)) => fragment,
                Some(Err(e)) => {
                    self.done = true;
                    return Some(Err(e));
                }
                None => {
                    self.done = true;
                    return self.take_pending().map(Ok);
                }
            };

            self.pending.push_str(&fragment);

            if let Some(pos) = self.pending.find(&self.stop) {
                self.done = true;
                self.pending.truncate(pos);
                return self.take_pending().map(Ok);
            }

            let emit_len = self.pending.len() - self.partial_match_len();
            if emit_len > 0 {
                let held = self.pending.split_off(emit_len);
                return Some(Ok(mem::replace(&mut self.pending, held)));
            }
        }
    }
}

/// Adds `.stop_at(..)` to fragment streams
pub trait FragmentStreamExt: Sized {
    fn stop_at(self, stop: impl Into<String>) -> StopAt<Self>;
}

impl<I, E> FragmentStreamExt for I
where
    I: Iterator<Item = Result<String, E>>,
{
    fn stop_at(self, stop: impl Into<String>) -> StopAt<Self> {
        StopAt::new(self, stop)
    }
}

/// Concatenate fragments in arrival order and trim the result
pub fn collect_suggestion<I, E>(fragments: I) -> Result<String, E>
where
    I: IntoIterator<Item = Result<String, E>>,
{
    let mut suggestion = String::new();
    for fragment in fragments {
        suggestion.push_str(&fragment?);
    }
    Ok(suggestion.trim().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn ok_fragments(parts: &[&str]) -> Vec<Result<String, String>> {
        parts.iter().map(|p| Ok((*p).to_string())).collect()
    }

    #[test]
    fn test_collect_concatenates_and_trims() {
        let fragments = ok_fragments(&["It", "'s", " cold", ", wear", " a coat."]);
        assert_eq!(collect_suggestion(fragments).unwrap(), "It's cold, wear a coat.");
    }

    #[test]
    fn test_collect_trims_surrounding_whitespace() {
        let fragments = ok_fragments(&["\n  ", "Take", " an umbrella.", "\n\n"]);
        assert_eq!(collect_suggestion(fragments).unwrap(), "Take an umbrella.");
    }

    #[test]
    fn test_collect_propagates_error() {
        let fragments: Vec<Result<String, String>> =
            vec![Ok("Wear".to_string()), Err("decode failed".to_string())];
        assert_eq!(collect_suggestion(fragments).unwrap_err(), "decode failed");
    }

    #[test]
    fn test_stop_at_without_stop_sequence_passes_through() {
        let fragments = ok_fragments(&["It", "'s", " cold", ", wear", " a coat."]);
        let out = collect_suggestion(fragments.into_iter().stop_at("User:")).unwrap();
        assert_eq!(out, "It's cold, wear a coat.");
    }

    #[rstest]
    #[case(&["Wear a coat.", "\nUser: what", " else?"], "Wear a coat.")]
    #[case(&["Wear a coat.\nUs", "er: what else?"], "Wear a coat.")]
    #[case(&["Shorts. U", "s", "e", "r", ":", " more"], "Shorts.")]
    #[case(&["User: hi"], "")]
    #[case(&["Use sunscreen. ", "Users love hats."], "Use sunscreen. Users love hats.")]
    #[case(&["Bring a jacket", " U"], "Bring a jacket U")]
    fn test_stop_at_truncates(#[case] parts: &[&str], #[case] expected: &str) {
        let out = collect_suggestion(ok_fragments(parts).into_iter().stop_at("User:")).unwrap();
        assert_eq!(out, expected);
    }

    #[test]
    fn test_stop_at_never_yields_stop_text() {
        let parts = ["A light ", "sweater. Us", "er", ": next"];
        let yielded: Vec<String> = ok_fragments(&parts)
            .into_iter()
            .stop_at("User:")
            .map(Result::unwrap)
            .collect();

        assert_eq!(yielded, vec!["A light ".to_string(), "sweater. ".to_string()]);
    }

    #[test]
    fn test_stop_at_stops_polling_inner() {
        let mut polled = 0;
        let source = ["Boots.", "User:", "never", "read"].into_iter().map(|p| {
            polled += 1;
            Ok::<_, String>(p.to_string())
        });

        let out = collect_suggestion(source.stop_at("User:")).unwrap();
        assert_eq!(out, "Boots.");
        assert_eq!(polled, 2);
    }

    #[test]
    fn test_stop_at_empty_stop_sequence_is_disabled() {
        let out = collect_suggestion(ok_fragments(&["User: a", "b"]).into_iter().stop_at("")).unwrap();
        assert_eq!(out, "User: ab");
    }

    #[test]
    fn test_stop_at_multibyte_text() {
        let out = collect_suggestion(ok_fragments(&["Wear a coat ☂", "Üser", " ok"]).into_iter().stop_at("Ü:")).unwrap();
        assert_eq!(out, "Wear a coat ☂Üser ok");
    }
}
