use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub struct Binding {
    pub name: String,
    pub value: f64,
}

#[derive(Debug, Clone, Default)]
pub struct Environment {
    bindings: Vec<Binding>,
}

impl Environment {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<f64> {
        self.bindings
            .iter()
            .find(|binding| binding.name == name)
            .map(|binding| binding.value)
    }

    pub fn lookup(&self, name: &str) -> f64 {
        self.get(name).unwrap_or(0.0)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn record(&mut self, name: &str, value: f64) {
        match self.bindings.iter_mut().find(|binding| binding.name == name) {
            Some(binding) => binding.value = value,
            None => self.bindings.push(Binding {
                name: name.to_owned(),
                value,
            }),
        }
    }

    // stable: equal lengths keep insertion order
    pub fn names_by_descending_length(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .bindings
            .iter()
            .map(|binding| binding.name.clone())
            .collect();
        names.sort_by(|left, right| right.len().cmp(&left.len()));
        names
    }

    pub fn bindings(&self) -> &[Binding] {
        &self.bindings
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(")?;
        for (index, binding) in self.bindings.iter().enumerate() {
            if index > 0 {
                write!(f, ",")?;
            }
            write!(f, "{}={}", binding.name, binding.value)?;
        }
        write!(f, ")")
    }
}
