use super::types::Assignment;
use regex::Regex;
use std::sync::OnceLock;

fn assignment_re() -> &'static Regex {
    // `=` must not be followed by another `=`, so `a == b` stays a comparison.
    static ASSIGNMENT_RE: OnceLock<Regex> = OnceLock::new();
    ASSIGNMENT_RE.get_or_init(|| {
        Regex::new(r"^\s*([A-Za-z_][A-Za-z0-9_]*)\s*=(?:([^=].*))?$").expect("valid regex")
    })
}

/// Split `name = expression`; `None` when the line is not assignment-shaped.
pub fn split_assignment(line: &str) -> Option<Assignment<'_>> {
    let captures = assignment_re().captures(line)?;
    let name = captures.get(1)?.as_str();
    let expression = captures.get(2).map_or("", |m| m.as_str()).trim();
    Some(Assignment { name, expression })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_assignment() {
        assert_eq!(
            split_assignment("radius = 5.5"),
            Some(Assignment {
                name: "radius",
                expression: "5.5"
            })
        );
        assert_eq!(
            split_assignment("  _b2=A + 3 "),
            Some(Assignment {
                name: "_b2",
                expression: "A + 3"
            })
        );
        assert_eq!(
            split_assignment("x ="),
            Some(Assignment {
                name: "x",
                expression: ""
            })
        );
    }

    #[test]
    fn test_rejects_non_assignments() {
        assert_eq!(split_assignment("a == b"), None);
        assert_eq!(split_assignment("2 = 3"), None);
        assert_eq!(split_assignment("f(x) = x"), None);
        assert_eq!(split_assignment("a + b"), None);
        assert_eq!(split_assignment("9lives = 1"), None);
    }
}
