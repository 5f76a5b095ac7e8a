use crate::environment::*;
use crate::functions::*;
use crate::scanning::*;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    increment,
    decrement,
}

impl Step {
    pub const ALL: [Step; 2] = [Step::increment, Step::decrement];

    pub fn apply(&self, value: f64) -> f64 {
        use Step::*;
        match self {
            increment => value + 1.0,
            decrement => value - 1.0,
        }
    }

    pub fn symbol(&self) -> &'static str {
        use Step::*;
        match self {
            increment => "++",
            decrement => "--",
        }
    }
}

#[derive(Debug, PartialEq, Eq)]
pub struct InvalidOperator;

impl FromStr for Step {
    type Err = InvalidOperator;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        use Step::*;
        match s {
            "++" => Ok(increment),
            "--" => Ok(decrement),
            _ => Err(InvalidOperator),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOperator {
    addition,
    subtraction,
    multiplication,
    division,
    exponentiation,
    modulus,
}

impl BinaryOperator {
    // compound assignments are tried in this order
    pub const ALL: [BinaryOperator; 6] = [
        BinaryOperator::addition,
        BinaryOperator::subtraction,
        BinaryOperator::multiplication,
        BinaryOperator::division,
        BinaryOperator::exponentiation,
        BinaryOperator::modulus,
    ];

    /// Division and modulus by exactly zero give zero instead of inf or NaN.
    pub fn call(&self, left: f64, right: f64) -> f64 {
        use BinaryOperator::*;

        match self {
            addition => left + right,
            subtraction => left - right,
            multiplication => left * right,
            division if right == 0.0 => 0.0,
            division => left / right,
            modulus if right == 0.0 => 0.0,
            modulus => left % right,
            exponentiation => left.powf(right),
        }
    }

    pub fn symbol(&self) -> &'static str {
        use BinaryOperator::*;
        match self {
            addition => "+",
            subtraction => "-",
            multiplication => "*",
            division => "/",
            exponentiation => "^",
            modulus => "%",
        }
    }

    pub fn compound_symbol(&self) -> &'static str {
        use BinaryOperator::*;
        match self {
            addition => "+=",
            subtraction => "-=",
            multiplication => "*=",
            division => "/=",
            exponentiation => "^=",
            modulus => "%=",
        }
    }
}

impl FromStr for BinaryOperator {
    type Err = InvalidOperator;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        use BinaryOperator::*;
        match s {
            "+" => Ok(addition),
            "-" => Ok(subtraction),
            "*" => Ok(multiplication),
            "/" => Ok(division),
            "^" => Ok(exponentiation),
            "%" => Ok(modulus),
            _ => Err(InvalidOperator),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    literal(f64),
    variable(String),
    postfix {
        name: String,
        step: Step,
    },
    binary {
        operator: BinaryOperator,
        left: Box<Expr>,
        right: Box<Expr>,
    },
    assignment {
        target: String,
        value: Box<Expr>,
    },
    call {
        function: String,
        argument: Box<Expr>,
    },
}

impl Expr {
    pub fn combine(operator: BinaryOperator, left: Expr, right: Expr) -> Self {
        Expr::binary {
            operator,
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    pub fn assign(target: &str, value: Expr) -> Self {
        Expr::assignment {
            target: target.to_owned(),
            value: Box::new(value),
        }
    }

    pub fn apply(function: &str, argument: Expr) -> Self {
        Expr::call {
            function: function.to_owned(),
            argument: Box::new(argument),
        }
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::literal(value) => write!(f, "{value}"),
            Expr::variable(name) => write!(f, "{name}"),
            Expr::postfix { name, step } => write!(f, "{name}{}", step.symbol()),
            Expr::binary { operator, left, right } => {
                write!(f, "({left} {} {right})", operator.symbol())
            }
            Expr::assignment { target, value } => write!(f, "{target} = {value}"),
            Expr::call { function, argument } => write!(f, "{function}({argument})"),
        }
    }
}

/// A statement whose `++name` / `--name` operators have not been applied yet.
///
/// The tree already holds the stepped values as literals, so `prefix_steps`
/// must be committed right after parsing, before anything else writes to the
/// environment.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedStatement {
    pub root: Expr,
    pub prefix_steps: Vec<(String, Step)>,
}

impl ParsedStatement {
    pub fn commit(self, environment: &mut Environment) -> Expr {
        for (name, step) in &self.prefix_steps {
            let value = step.apply(environment.lookup(name));
            environment.record(name, value);
        }
        self.root
    }
}

#[derive(Debug, Clone, Copy)]
struct Mark {
    position: Checkpoint,
    staged: usize,
}

/// Recursive-descent parser for a single statement.
///
/// The parser reads the environment to resolve known variable names and to
/// allow compound assignment, but never writes to it: prefix operators are
/// staged and rolled back together with the scanner position.
pub struct Parser<'s, 'e> {
    source: StringScanner<'s>,
    environment: &'e Environment,
    functions: &'e FunctionRegistry,
    names: Vec<String>,
    staged: Vec<(String, Step)>,
}

impl<'s, 'e> Parser<'s, 'e> {
    pub fn new(
        statement: &'s str,
        environment: &'e Environment,
        functions: &'e FunctionRegistry,
    ) -> Self {
        Self {
            source: StringScanner::new(statement),
            environment,
            functions,
            names: environment.names_by_descending_length(),
            staged: Vec::new(),
        }
    }

    fn mark(&self) -> Mark {
        Mark {
            position: self.source.mark(),
            staged: self.staged.len(),
        }
    }

    fn rewind(&mut self, mark: Mark) {
        self.source.reset(mark.position);
        self.staged.truncate(mark.staged);
    }

    fn attempt<T>(&mut self, rule: impl FnOnce(&mut Self) -> Option<T>) -> Option<T> {
        let start = self.mark();
        let parsed = rule(self);
        if parsed.is_none() {
            self.rewind(start);
        }
        parsed
    }

    fn current_value(&self, name: &str) -> f64 {
        self.staged
            .iter()
            .filter(|(staged, _)| staged == name)
            .fold(self.environment.lookup(name), |value, (_, step)| step.apply(value))
    }

    fn match_known_name(&mut self) -> Option<String> {
        self.names
            .iter()
            .find(|name| self.source.match_literal(name))
            .cloned()
    }

    fn match_step(&mut self) -> Option<Step> {
        let symbol = self.source.match_any(Step::ALL.iter().map(Step::symbol))?;
        symbol.parse().ok()
    }

    fn match_operator(&mut self, symbols: &[&'static str]) -> Option<BinaryOperator> {
        let symbol = self.source.match_any(symbols.iter().copied())?;
        symbol.parse().ok()
    }

    // Statement := Assignment | Calculation
    pub fn parse_statement(mut self) -> Option<ParsedStatement> {
        let root = match self.parse_assignment() {
            Some(root) => root,
            None => self.parse_calculation()?,
        };
        Some(ParsedStatement {
            root,
            prefix_steps: self.staged,
        })
    }

    fn parse_assignment(&mut self) -> Option<Expr> {
        self.attempt(|parser| {
            let target = parser.source.read_identifier()?;
            let after_target = parser.mark();

            if parser.source.match_char('=') {
                if let Some(value) = parser.parse_complete_sum() {
                    return Some(Expr::assign(target, value));
                }
                parser.rewind(after_target);
            }

            if !parser.environment.contains(target) {
                return None;
            }
            for operator in BinaryOperator::ALL {
                if !parser.source.match_literal(operator.compound_symbol()) {
                    continue;
                }
                if let Some(value) = parser.parse_complete_sum() {
                    let current = Expr::variable(target.to_owned());
                    return Some(Expr::assign(
                        target,
                        Expr::combine(operator, current, value),
                    ));
                }
                parser.rewind(after_target);
            }
            None
        })
    }

    fn parse_calculation(&mut self) -> Option<Expr> {
        self.parse_complete_sum()
    }

    fn parse_complete_sum(&mut self) -> Option<Expr> {
        self.attempt(|parser| {
            let sum = parser.parse_sum()?;
            parser.source.at_end().then_some(sum)
        })
    }

    // Sum := Product (('+' | '-') Product)*
    fn parse_sum(&mut self) -> Option<Expr> {
        self.attempt(|parser| {
            let mut left = parser.parse_product()?;
            while let Some(operator) = parser.match_operator(&["+", "-"]) {
                let right = parser.parse_product()?;
                left = Expr::combine(operator, left, right);
            }
            Some(left)
        })
    }

    // Product := Factor (('*' | '/' | '%') Factor)*
    fn parse_product(&mut self) -> Option<Expr> {
        self.attempt(|parser| {
            let mut left = parser.parse_factor()?;
            while let Some(operator) = parser.match_operator(&["*", "/", "%"]) {
                let right = parser.parse_factor()?;
                left = Expr::combine(operator, left, right);
            }
            Some(left)
        })
    }

    // Factor := Function | Operand ('^' Factor)?
    //
    // Same language as `Power | Term` with `Power := Function | Term '^' Factor`,
    // but each alternative is parsed at most once per position.
    fn parse_factor(&mut self) -> Option<Expr> {
        if let Some(function) = self.parse_function() {
            return Some(function);
        }
        let base = self.parse_operand()?;

        let before_caret = self.mark();
        if self.source.match_char('^') {
            if let Some(exponent) = self.parse_factor() {
                return Some(Expr::combine(BinaryOperator::exponentiation, base, exponent));
            }
            self.rewind(before_caret);
        }
        Some(base)
    }

    // Group | Variable | Number
    fn parse_operand(&mut self) -> Option<Expr> {
        if let Some(group) = self.parse_group() {
            return Some(group);
        }
        if let Some(name) = self.source.read_identifier() {
            return Some(Expr::variable(name.to_owned()));
        }
        self.source.read_number().map(Expr::literal)
    }

    // Group := '(' Sum ')'
    fn parse_group(&mut self) -> Option<Expr> {
        self.attempt(|parser| {
            if !parser.source.match_char('(') {
                return None;
            }
            let inner = parser.parse_sum()?;
            parser.source.match_char(')').then_some(inner)
        })
    }

    // Function := PrefixIncDec | PostfixIncDec | KnownFunctionName '(' Sum ')'
    fn parse_function(&mut self) -> Option<Expr> {
        if let Some(prefix) = self.parse_prefix() {
            return Some(prefix);
        }
        if let Some(postfix) = self.parse_postfix() {
            return Some(postfix);
        }
        self.parse_call()
    }

    fn parse_prefix(&mut self) -> Option<Expr> {
        self.attempt(|parser| {
            let step = parser.match_step()?;
            let name = parser.match_known_name()?;
            let value = step.apply(parser.current_value(&name));
            tracing::trace!(%name, value, "staged prefix {}", step.symbol());
            parser.staged.push((name, step));
            Some(Expr::literal(value))
        })
    }

    fn parse_postfix(&mut self) -> Option<Expr> {
        self.attempt(|parser| {
            let name = parser.match_known_name()?;
            let step = parser.match_step()?;
            Some(Expr::postfix { name, step })
        })
    }

    fn parse_call(&mut self) -> Option<Expr> {
        self.attempt(|parser| {
            let functions = parser.functions;
            let function = parser.source.match_any(functions.names())?;
            if !parser.source.match_char('(') {
                return None;
            }
            let argument = parser.parse_sum()?;
            if !parser.source.match_char(')') {
                return None;
            }
            Some(Expr::apply(function, argument))
        })
    }
}

pub fn parse(
    statement: &str,
    environment: &Environment,
    functions: &FunctionRegistry,
) -> Option<ParsedStatement> {
    Parser::new(statement, environment, functions).parse_statement()
}
