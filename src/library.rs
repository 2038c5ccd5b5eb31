use alloc::rc::Rc;
use alloc::vec::Vec;

use crate::compiler::PatternCompiler;
use crate::error::CompileError;
use crate::pattern::{Pattern, PatternDefinition};

/// Name lookup used by the player to find the pattern a client asked for
pub trait PatternResolver {
    fn resolve_pattern(&self, name: &str) -> Option<Rc<Pattern>>;
}

/// Set of compiled patterns, immutable once loaded
#[derive(Debug, Clone, Default)]
pub struct PatternLibrary {
    patterns: Vec<Rc<Pattern>>,
}

impl PatternLibrary {
    pub const fn new() -> Self {
        Self {
            patterns: Vec::new(),
        }
    }

    /// Compile every definition, failing on the first broken one
    pub fn compile<'d, I>(compiler: &PatternCompiler<'_>, definitions: I) -> Result<Self, CompileError>
    where
        I: IntoIterator<Item = &'d PatternDefinition>,
    {
        let mut library = Self::new();
        for definition in definitions {
            let pattern = compiler.compile(definition)?;
            library.insert(pattern)?;
        }
        log::debug!("{} patterns loaded", library.len());

        Ok(library)
    }

    /// Add a compiled pattern, names must be unique
    pub fn insert(&mut self, pattern: Pattern) -> Result<(), CompileError> {
        if self.get(pattern.name()).is_some() {
            return Err(CompileError::DuplicatePattern(pattern.name().into()));
        }
        self.patterns.push(Rc::new(pattern));
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&Rc<Pattern>> {
        self.patterns.iter().find(|pattern| pattern.name() == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Rc<Pattern>> {
        self.patterns.iter()
    }

    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    pub fn dump(&self) {
        log::info!("patterns:");
        for pattern in &self.patterns {
            pattern.dump();
        }
    }
}

impl PatternResolver for PatternLibrary {
    fn resolve_pattern(&self, name: &str) -> Option<Rc<Pattern>> {
        self.get(name).cloned()
    }
}
