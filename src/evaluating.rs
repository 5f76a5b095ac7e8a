use crate::environment::*;
use crate::functions::*;
use crate::parsing::*;

pub fn evaluate(expression: &Expr, environment: &mut Environment, functions: &FunctionRegistry) -> f64 {
    match expression {
        Expr::literal(value) => *value,

        Expr::variable(name) => environment.lookup(name),

        Expr::postfix { name, step } => {
            let old = environment.lookup(name);
            environment.record(name, step.apply(old));
            old
        },

        Expr::binary { operator, left, right } => {
            let left = evaluate(left, environment, functions);
            let right = evaluate(right, environment, functions);
            operator.call(left, right)
        },

        Expr::assignment { target, value } => {
            let value = evaluate(value, environment, functions);
            environment.record(target, value);
            value
        },

        Expr::call { function, argument } => {
            let argument = evaluate(argument, environment, functions);
            functions.apply(function, argument)
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use BinaryOperator::*;

    fn run(statement: &str, environment: &mut Environment) -> Option<f64> {
        let functions = FunctionRegistry::new();
        let root = parse(statement, environment, &functions)?.commit(environment);
        Some(evaluate(&root, environment, &functions))
    }

    #[test]
    fn literals_and_unknown_variables() {
        let mut environment = Environment::new();
        let functions = FunctionRegistry::new();
        assert_eq!(evaluate(&Expr::literal(2.5), &mut environment, &functions), 2.5);
        assert_eq!(evaluate(&Expr::variable("ghost".into()), &mut environment, &functions), 0.0);
        assert!(environment.is_empty());
    }

    #[test]
    fn operands_evaluate_left_to_right() {
        let mut environment = Environment::new();
        environment.record("i", 1.0);
        assert_eq!(run("i++ - i", &mut environment), Some(-1.0));
        assert_eq!(environment.lookup("i"), 2.0);
    }

    #[test]
    fn postfix_steps_exactly_once() {
        let mut environment = Environment::new();
        environment.record("i", 0.0);
        assert_eq!(run("i++", &mut environment), Some(0.0));
        assert_eq!(environment.lookup("i"), 1.0);
        assert_eq!(run("i--", &mut environment), Some(1.0));
        assert_eq!(environment.lookup("i"), 0.0);
    }

    #[test]
    fn prefix_is_visible_to_the_rest_of_the_statement() {
        let mut environment = Environment::new();
        environment.record("i", 0.0);
        assert_eq!(run("x = i++ + ++i", &mut environment), Some(2.0));
        assert_eq!(environment.lookup("i"), 2.0);
        assert_eq!(environment.lookup("x"), 2.0);
    }

    #[test]
    fn reevaluating_a_tree_keeps_stepping_forward() {
        let mut environment = Environment::new();
        let functions = FunctionRegistry::new();
        environment.record("i", 3.0);
        let root = parse("j = ++i + i++", &environment, &functions)
            .unwrap()
            .commit(&mut environment);
        assert_eq!(environment.lookup("i"), 4.0);

        assert_eq!(evaluate(&root, &mut environment, &functions), 8.0);
        assert_eq!(environment.lookup("i"), 5.0);
        assert_eq!(evaluate(&root, &mut environment, &functions), 9.0);
        assert_eq!(environment.lookup("i"), 6.0);
        assert_eq!(environment.lookup("j"), 9.0);
    }

    #[test]
    fn assignment_returns_and_records() {
        let mut environment = Environment::new();
        assert_eq!(run("a = 5 % 0", &mut environment), Some(0.0));
        assert_eq!(run("b = 5 / 0", &mut environment), Some(0.0));
        assert_eq!(run("c = 0 ^ -1", &mut environment), None);
        assert_eq!(run("c = 0 ^ (0 - 1)", &mut environment), Some(f64::INFINITY));
        assert_eq!(environment.to_string(), "(a=0,b=0,c=inf)");
    }

    #[test]
    fn calls_use_the_registry() {
        let mut environment = Environment::new();
        let functions = FunctionRegistry::new();
        let call = Expr::apply("cos", Expr::literal(0.0));
        assert_eq!(evaluate(&call, &mut environment, &functions), 1.0);

        let missing = Expr::apply("sqrt", Expr::literal(4.0));
        assert_eq!(evaluate(&missing, &mut environment, &functions), 0.0);
    }

    #[test]
    fn nan_propagates_through_power_and_functions() {
        let mut environment = Environment::new();
        let functions = FunctionRegistry::new();
        let tree = Expr::combine(addition, Expr::apply("acos", Expr::literal(3.0)), Expr::literal(1.0));
        assert!(evaluate(&tree, &mut environment, &functions).is_nan());
    }
}
