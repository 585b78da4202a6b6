//! Syntactic shapes of operator invocations and how they unparse.

use std::fmt;

/// How an operator is written in the query language
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Syntax {
    /// `F(a, b)`
    Function,
    /// `a.F(b, c)`
    Method,
    /// `a.F`
    Property,
    /// `a F b`
    Infix,
    /// `F a`
    Prefix,
    /// `CASE v WHEN m THEN r ... ELSE d END`
    Case,
}

impl Syntax {
    /// Render a call with this syntax, given already rendered arguments
    pub fn unparse(
        &self,
        f: &mut fmt::Formatter<'_>,
        name: &str,
        args: &[impl fmt::Display],
    ) -> fmt::Result {
        match self {
            Syntax::Function => {
                write!(f, "{}(", name)?;
                write_list(f, args)?;
                write!(f, ")")
            }
            Syntax::Method => match args.split_first() {
                Some((receiver, rest)) => {
                    write!(f, "{}.{}(", receiver, name)?;
                    write_list(f, rest)?;
                    write!(f, ")")
                }
                None => write!(f, "{}()", name),
            },
            Syntax::Property => match args.first() {
                Some(receiver) => write!(f, "{}.{}", receiver, name),
                None => write!(f, "{}", name),
            },
            Syntax::Infix => {
                for (i, arg) in args.iter().enumerate() {
                    if i > 0 {
                        write!(f, " {} ", name)?;
                    }
                    write!(f, "{}", arg)?;
                }
                Ok(())
            }
            Syntax::Prefix => {
                write!(f, "{}", name)?;
                for arg in args {
                    write!(f, " {}", arg)?;
                }
                Ok(())
            }
            Syntax::Case => {
                write!(f, "CASE")?;
                let Some((value, rest)) = args.split_first() else {
                    return write!(f, " END");
                };
                write!(f, " {}", value)?;
                let mut pairs = rest.chunks_exact(2);
                for pair in pairs.by_ref() {
                    write!(f, " WHEN {} THEN {}", pair[0], pair[1])?;
                }
                if let Some(default) = pairs.remainder().first() {
                    write!(f, " ELSE {}", default)?;
                }
                write!(f, " END")
            }
        }
    }
}

fn write_list(f: &mut fmt::Formatter<'_>, args: &[impl fmt::Display]) -> fmt::Result {
    for (i, arg) in args.iter().enumerate() {
        if i > 0 {
            write!(f, ", ")?;
        }
        write!(f, "{}", arg)?;
    }
    Ok(())
}

impl fmt::Display for Syntax {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Syntax::Function => "function",
            Syntax::Method => "method",
            Syntax::Property => "property",
            Syntax::Infix => "infix",
            Syntax::Prefix => "prefix",
            Syntax::Case => "case",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Call(Syntax, &'static str, Vec<&'static str>);

    impl fmt::Display for Call {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            self.0.unparse(f, self.1, &self.2)
        }
    }

    #[test]
    fn test_unparse_shapes() {
        assert_eq!(Call(Syntax::Function, "Abs", vec!["x"]).to_string(), "Abs(x)");
        assert_eq!(
            Call(Syntax::Method, "Properties", vec!["m", "\"Salary\"", "TYPED"]).to_string(),
            "m.Properties(\"Salary\", TYPED)"
        );
        assert_eq!(Call(Syntax::Property, "Name", vec!["m"]).to_string(), "m.Name");
        assert_eq!(Call(Syntax::Infix, "+", vec!["1", "2"]).to_string(), "1 + 2");
        assert_eq!(Call(Syntax::Prefix, "NOT", vec!["x"]).to_string(), "NOT x");
    }

    #[test]
    fn test_unparse_case() {
        assert_eq!(
            Call(Syntax::Case, "_CaseMatch", vec!["v", "1", "\"a\"", "2", "\"b\""]).to_string(),
            "CASE v WHEN 1 THEN \"a\" WHEN 2 THEN \"b\" END"
        );
        assert_eq!(
            Call(Syntax::Case, "_CaseMatch", vec!["v", "1", "\"a\"", "\"z\""]).to_string(),
            "CASE v WHEN 1 THEN \"a\" ELSE \"z\" END"
        );
    }
}
