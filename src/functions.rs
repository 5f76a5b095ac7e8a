#[derive(Debug, Clone, Copy)]
pub struct Function {
    pub name: &'static str,
    pub action: fn(f64) -> f64,
}

// Trigonometry is in radians. Domain errors are not checked: `asin(2)` is NaN.
#[derive(Debug, Clone)]
pub struct FunctionRegistry {
    functions: Vec<Function>,
}

impl FunctionRegistry {
    pub fn new() -> Self {
        let functions = vec![
            Function { name: "sin", action: f64::sin },
            Function { name: "asin", action: f64::asin },
            Function { name: "cos", action: f64::cos },
            Function { name: "acos", action: f64::acos },
            Function { name: "tan", action: f64::tan },
            Function { name: "atan", action: f64::atan },
            Function { name: "ceil", action: f64::ceil },
            Function { name: "floor", action: f64::floor },
        ];
        Self { functions }
    }

    pub fn get(&self, name: &str) -> Option<&Function> {
        self.functions.iter().find(|function| function.name == name)
    }

    pub fn apply(&self, name: &str, value: f64) -> f64 {
        self.get(name).map_or(0.0, |function| (function.action)(value))
    }

    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.functions.iter().map(|function| function.name)
    }
}

impl Default for FunctionRegistry {
    fn default() -> Self {
        Self::new()
    }
}
