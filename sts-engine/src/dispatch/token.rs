/// An identifier for one request. Later requests get larger generations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Generation(u64);

impl Generation {
    /// The raw counter value
    pub fn get(&self) -> u64 {
        self.0
    }
}

/// Holds the value for the most recently issued generation and refuses
/// answers to any earlier one.
///
/// Every new request calls [`Superseding::issue`]; when its answer arrives it
/// is offered with [`Superseding::accept`], which only takes it if no newer
/// request was issued in the meantime. An answer to an older request that
/// arrives late never overwrites the newer state.
#[derive(Debug)]
pub struct Superseding<T> {
    issued: u64,
    current: Option<(Generation, T)>,
}

impl<T> Default for Superseding<T> {
    fn default() -> Self {
        Self {
            issued: 0,
            current: None,
        }
    }
}

impl<T> Superseding<T> {
    /// Issue a new generation, making it the desired one.
    pub fn issue(&mut self) -> Generation {
        self.issued += 1;
        Generation(self.issued)
    }

    /// The generation whose answer is currently wanted.
    pub fn desired(&self) -> Option<Generation> {
        (self.issued > 0).then_some(Generation(self.issued))
    }

    /// Whether answers for `generation` are still wanted.
    pub fn is_desired(&self, generation: Generation) -> bool {
        self.desired() == Some(generation)
    }

    /// Offer the answer for `generation`. Returns false, dropping `value`,
    /// if a newer generation has been issued since.
    pub fn accept(&mut self, generation: Generation, value: T) -> bool {
        if !self.is_desired(generation) {
            return false;
        }
        self.current = Some((generation, value));
        true
    }

    /// The last accepted value.
    pub fn current(&self) -> Option<&T> {
        self.current.as_ref().map(|(_, value)| value)
    }

    /// The generation the last accepted value answered.
    pub fn current_generation(&self) -> Option<Generation> {
        self.current.as_ref().map(|(generation, _)| *generation)
    }
}
