use std::fmt;

/// Binary algebraic operators.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Algebraic {
    Add,
    Subtract,
    Multiply,
    Divide,
    Power,
}

impl Algebraic {
    /// Applies the operator. Division by an exact zero yields `+infinity`.
    pub fn apply(&self, left: f64, right: f64) -> f64 {
        match self {
            Algebraic::Add => left + right,
            Algebraic::Subtract => left - right,
            Algebraic::Multiply => left * right,
            Algebraic::Divide => {
                if right == 0.0 {
                    f64::INFINITY
                } else {
                    left / right
                }
            }
            Algebraic::Power => left.powf(right),
        }
    }

    pub fn symbol(&self) -> char {
        match self {
            Algebraic::Add => '+',
            Algebraic::Subtract => '-',
            Algebraic::Multiply => '*',
            Algebraic::Divide => '/',
            Algebraic::Power => '^',
        }
    }
}

impl TryFrom<char> for Algebraic {
    type Error = char;

    fn try_from(value: char) -> Result<Self, Self::Error> {
        match value {
            '+' => Ok(Algebraic::Add),
            '-' => Ok(Algebraic::Subtract),
            '*' => Ok(Algebraic::Multiply),
            '/' => Ok(Algebraic::Divide),
            '^' => Ok(Algebraic::Power),
            other => Err(other),
        }
    }
}

/// Unary trigonometric functions, numbered by their selector index.
#[repr(u8)]
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Trigonometric {
    Sin = 1,
    Cos = 2,
    Tan = 3,
    Sec = 4,
    Csc = 5,
    Ctg = 6,
}

impl Trigonometric {
    pub const NAMES: [&'static str; 6] = ["sin", "cos", "tan", "sec", "csc", "ctg"];

    /// Looks up a lower-case function name.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "sin" => Some(Self::Sin),
            "cos" => Some(Self::Cos),
            "tan" => Some(Self::Tan),
            "sec" => Some(Self::Sec),
            "csc" => Some(Self::Csc),
            "ctg" => Some(Self::Ctg),
            _ => None,
        }
    }

    pub fn from_selector(selector: u8) -> Option<Self> {
        match selector {
            1 => Some(Self::Sin),
            2 => Some(Self::Cos),
            3 => Some(Self::Tan),
            4 => Some(Self::Sec),
            5 => Some(Self::Csc),
            6 => Some(Self::Ctg),
            _ => None,
        }
    }

    pub fn selector(&self) -> u8 {
        *self as u8
    }

    pub fn name(&self) -> &'static str {
        Self::NAMES[self.selector() as usize - 1]
    }

    /// Applies the function. Reciprocals of an exact zero yield `+infinity`.
    pub fn apply(&self, value: f64) -> f64 {
        match self {
            Trigonometric::Sin => value.sin(),
            Trigonometric::Cos => value.cos(),
            Trigonometric::Tan => value.tan(),
            Trigonometric::Sec => reciprocal(value.cos()),
            Trigonometric::Csc => reciprocal(value.sin()),
            Trigonometric::Ctg => reciprocal(value.tan()),
        }
    }
}

fn reciprocal(denominator: f64) -> f64 {
    if denominator == 0.0 {
        f64::INFINITY
    } else {
        1.0 / denominator
    }
}

/// The closed set of values a derivation tree node can hold.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum Operation {
    Constant(f64),
    /// The free variable; `negated` marks the `-x` spelling.
    Variable { negated: bool },
    Algebraic(Algebraic),
    Trigonometric(Trigonometric),
    ParenOpenMarker,
    ParenCloseMarker,
}

impl Operation {
    /// Number of operands the operation consumes. Markers consume nothing and
    /// are never evaluated.
    pub fn arity(&self) -> usize {
        match self {
            Operation::Algebraic(_) => 2,
            Operation::Trigonometric(_) => 1,
            Operation::Constant(_)
            | Operation::Variable { .. }
            | Operation::ParenOpenMarker
            | Operation::ParenCloseMarker => 0,
        }
    }

    pub fn is_marker(&self) -> bool {
        matches!(
            self,
            Operation::ParenOpenMarker | Operation::ParenCloseMarker
        )
    }

    /// Resolves a leaf to its value, substituting `x` for the free variable.
    pub fn resolve(&self, x: f64) -> Option<f64> {
        match self {
            Operation::Constant(value) => Some(*value),
            Operation::Variable { negated: false } => Some(x),
            Operation::Variable { negated: true } => Some(-x),
            _ => None,
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operation::Constant(value) => write!(f, "{}", value),
            Operation::Variable { negated: false } => write!(f, "x"),
            Operation::Variable { negated: true } => write!(f, "-x"),
            Operation::Algebraic(op) => write!(f, "{}", op.symbol()),
            Operation::Trigonometric(function) => write!(f, "{}", function.name()),
            Operation::ParenOpenMarker => write!(f, "("),
            Operation::ParenCloseMarker => write!(f, ")"),
        }
    }
}
