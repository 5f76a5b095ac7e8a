use crate::environment::*;
use crate::error_handling::*;
use crate::evaluating::*;
use crate::functions::*;
use crate::parsing::*;

#[derive(Debug, Clone, Default)]
pub struct Interpreter {
    environment: Environment,
    functions: FunctionRegistry,
    backlog: Vec<String>,
}

impl Interpreter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn submit_statement(&mut self, statement: impl Into<String>) {
        self.backlog.push(statement.into());
    }

    pub fn pending(&self) -> usize {
        self.backlog.len()
    }

    /// Unparsable statements change nothing; their slot in the report holds the error.
    pub fn evaluate_all(&mut self) -> Vec<Result<f64>> {
        let backlog = std::mem::take(&mut self.backlog);
        backlog
            .iter()
            .map(|statement| {
                let outcome = self.evaluate_one(statement);
                if let Err(error) = &outcome {
                    tracing::warn!(%error, "dropping statement");
                }
                outcome
            })
            .collect()
    }

    /// Parses `statement` and applies its `++name` / `--name` operators.
    /// Nothing changes when the statement does not parse.
    pub fn parse_one(&mut self, statement: &str) -> Option<Expr> {
        let parsed = parse(statement, &self.environment, &self.functions)?;
        Some(parsed.commit(&mut self.environment))
    }

    pub fn run(&mut self, tree: &Expr) -> f64 {
        evaluate(tree, &mut self.environment, &self.functions)
    }

    #[tracing::instrument(level = "debug", skip(self))]
    pub fn evaluate_one(&mut self, statement: &str) -> Result<f64> {
        let tree = self
            .parse_one(statement)
            .ok_or_else(|| CalcError::unparsable(statement.to_owned()))?;
        tracing::debug!(%tree, "parsed");

        let value = self.run(&tree);
        tracing::debug!(value, "evaluated");
        Ok(value)
    }

    pub fn lookup_variable(&self, name: &str) -> f64 {
        self.environment.lookup(name)
    }

    pub fn variable_names(&self) -> Vec<String> {
        self.environment.names_by_descending_length()
    }

    pub fn environment(&self) -> &Environment {
        &self.environment
    }
}
