use serde::Deserialize;

/// What happens to markup text runs before they are compiled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WhitespacePolicy {
    /// Text is emitted exactly as written.
    #[default]
    Preserve,
    /// Leading and trailing whitespace of every text run is stripped.
    Trim,
    /// Line-aware: each line is trimmed (except the outer edges of the run),
    /// blank lines are dropped and the rest joined with one space.
    Collapse,
}

impl WhitespacePolicy {
    /// Apply the policy to one text run; `None` means the run vanishes.
    pub fn apply<'a>(self, text: &'a str) -> Option<std::borrow::Cow<'a, str>> {
        use std::borrow::Cow;

        let out: Cow<'a, str> = match self {
            WhitespacePolicy::Preserve => Cow::Borrowed(text),
            WhitespacePolicy::Trim => Cow::Borrowed(text.trim()),
            WhitespacePolicy::Collapse => {
                if !text.contains('\n') {
                    Cow::Borrowed(text)
                } else {
                    Cow::Owned(collapse_lines(text))
                }
            }
        };
        (!out.is_empty()).then_some(out)
    }
}

fn collapse_lines(text: &str) -> String {
    let lines: Vec<&str> = text
        .split('\n')
        .map(|line| line.strip_suffix('\r').unwrap_or(line))
        .collect();
    let last = lines.len().saturating_sub(1);
    let mut kept = Vec::with_capacity(lines.len());
    for (i, line) in lines.iter().enumerate() {
        let mut line = *line;
        if i != 0 {
            line = line.trim_start();
        }
        if i != last {
            line = line.trim_end();
        }
        if !line.trim().is_empty() {
            kept.push(line);
        }
    }
    kept.join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn preserve_keeps_everything() {
        assert_eq!(
            WhitespacePolicy::Preserve.apply("  a \n b ").as_deref(),
            Some("  a \n b ")
        );
    }

    #[test]
    fn trim_drops_empty_runs() {
        assert_eq!(WhitespacePolicy::Trim.apply("\n    ").as_deref(), None);
        assert_eq!(WhitespacePolicy::Trim.apply("  hi  ").as_deref(), Some("hi"));
    }

    #[test]
    fn collapse_joins_lines() {
        let text = "\n    Hello\n    world  \n  ";
        assert_eq!(
            WhitespacePolicy::Collapse.apply(text).as_deref(),
            Some("Hello world")
        );
        assert_eq!(WhitespacePolicy::Collapse.apply("a  b").as_deref(), Some("a  b"));
        assert_eq!(WhitespacePolicy::Collapse.apply("\n   \n").as_deref(), None);
    }
}
