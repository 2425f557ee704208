//! Case registry.
//!
//! Cases are grouped by suite. Suites keep first-registration order and
//! cases keep registration order within their suite.
//!
//! # Registration
//!
//! There are two ways to get a case into the process-wide registry:
//!
//! - `#[casework::case(suite = "...")]` on a function submits a [`CaseEntry`]
//!   through `inventory`. Entries are collected when the registry is first
//!   touched and registered in declaration-site order (file, line, column),
//!   so the result does not depend on link order.
//! - [`register`] adds a case at runtime, for generated or closure-based cases.
//!
//! The registry is sealed by [`run_all`](crate::run_all); registering after
//! that fails with [`RegistryError::Sealed`].
//!
//! Duplicate `(suite, name)` pairs are kept: both cases run and both appear in
//! the report. A warning is logged.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, LazyLock};

use parking_lot::Mutex;

use crate::signal::CaseResult;

/// Body of a test case.
pub type CaseBody = Arc<dyn Fn() -> CaseResult + Send + Sync>;

/// A case declared with `#[case]`, collected through `inventory`.
///
/// Constructed by the attribute macro; not meant to be written by hand.
pub struct CaseEntry {
    pub suite: &'static str,
    pub name: &'static str,
    pub body: fn() -> CaseResult,
    pub file: &'static str,
    pub line: u32,
    pub column: u32,
}

inventory::collect!(CaseEntry);

/// A registered case. Identity is `(suite, name)`.
#[derive(Clone)]
pub struct TestCase {
    suite: Arc<str>,
    name: Arc<str>,
    body: CaseBody,
}

impl TestCase {
    pub fn suite(&self) -> &str {
        &self.suite
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Run the body. Panics are not caught here; that is the runner's job.
    pub fn call(&self) -> CaseResult {
        (self.body)()
    }
}

impl fmt::Debug for TestCase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TestCase")
            .field("suite", &self.suite)
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

/// Error type for registry operations
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    /// Suite name is empty
    EmptySuiteName,
    /// Case name is empty
    EmptyCaseName,
    /// The runner has started; no more cases can be added
    Sealed,
}

impl fmt::Display for RegistryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RegistryError::EmptySuiteName => write!(f, "suite name cannot be empty"),
            RegistryError::EmptyCaseName => write!(f, "case name cannot be empty"),
            RegistryError::Sealed => {
                write!(f, "registry is sealed: cases cannot be added once the run has started")
            }
        }
    }
}

impl std::error::Error for RegistryError {}

#[derive(Debug, Clone)]
struct SuiteSlot {
    name: Arc<str>,
    cases: Vec<TestCase>,
}

/// Suites and their cases, in registration order.
///
/// Cloning is cheap: case bodies are shared.
#[derive(Debug, Clone, Default)]
pub struct CaseRegistry {
    suites: Vec<SuiteSlot>,
    suite_index: HashMap<Arc<str>, usize>,
    case_count: usize,
    sealed: bool,
}

impl CaseRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a case to `suite`, creating the suite if needed.
    pub fn register<F>(
        &mut self,
        suite: impl Into<String>,
        name: impl Into<String>,
        body: F,
    ) -> Result<(), RegistryError>
    where
        F: Fn() -> CaseResult + Send + Sync + 'static,
    {
        self.register_body(suite.into(), name.into(), Arc::new(body))
    }

    fn register_body(
        &mut self,
        suite: String,
        name: String,
        body: CaseBody,
    ) -> Result<(), RegistryError> {
        if self.sealed {
            return Err(RegistryError::Sealed);
        }
        if suite.is_empty() {
            return Err(RegistryError::EmptySuiteName);
        }
        if name.is_empty() {
            return Err(RegistryError::EmptyCaseName);
        }

        let idx = match self.suite_index.get(suite.as_str()) {
            Some(&idx) => idx,
            None => {
                let name: Arc<str> = Arc::from(suite);
                let idx = self.suites.len();
                self.suite_index.insert(name.clone(), idx);
                self.suites.push(SuiteSlot {
                    name,
                    cases: Vec::new(),
                });
                idx
            }
        };

        let slot = &mut self.suites[idx];
        if slot.cases.iter().any(|case| *case.name == *name) {
            tracing::warn!(
                suite = %slot.name,
                case = %name,
                "duplicate case registration, both will run"
            );
        }

        slot.cases.push(TestCase {
            suite: slot.name.clone(),
            name: Arc::from(name),
            body,
        });
        self.case_count += 1;
        Ok(())
    }

    /// Suites in first-registration order. Restartable: call again to
    /// iterate from the start.
    pub fn suites(&self) -> impl Iterator<Item = Suite<'_>> + Clone + '_ {
        self.suites.iter().map(|slot| Suite {
            name: &slot.name,
            cases: &slot.cases,
        })
    }

    /// All cases, suite by suite.
    pub fn cases(&self) -> impl Iterator<Item = &TestCase> + '_ {
        self.suites.iter().flat_map(|slot| slot.cases.iter())
    }

    /// Number of registered cases.
    pub fn len(&self) -> usize {
        self.case_count
    }

    pub fn is_empty(&self) -> bool {
        self.case_count == 0
    }

    pub fn suite_count(&self) -> usize {
        self.suites.len()
    }

    /// Reject further registrations.
    pub fn seal(&mut self) {
        self.sealed = true;
    }

    pub fn is_sealed(&self) -> bool {
        self.sealed
    }
}

/// A suite and its cases, borrowed from a [`CaseRegistry`].
#[derive(Debug, Clone, Copy)]
pub struct Suite<'a> {
    pub name: &'a str,
    pub cases: &'a [TestCase],
}

static GLOBAL: LazyLock<Mutex<CaseRegistry>> = LazyLock::new(|| {
    let mut entries: Vec<&'static CaseEntry> = inventory::iter::<CaseEntry>.into_iter().collect();
    entries.sort_by_key(|entry| (entry.file, entry.line, entry.column));

    let mut registry = CaseRegistry::new();
    for entry in entries {
        let body = entry.body;
        if let Err(err) = registry.register(entry.suite, entry.name, body) {
            tracing::error!(
                suite = entry.suite,
                case = entry.name,
                file = entry.file,
                line = entry.line,
                %err,
                "skipping declared case"
            );
        }
    }
    tracing::debug!(
        cases = registry.len(),
        suites = registry.suite_count(),
        "case registry initialised"
    );
    Mutex::new(registry)
});

/// Register a case in the process-wide registry.
pub fn register<F>(
    suite: impl Into<String>,
    name: impl Into<String>,
    body: F,
) -> Result<(), RegistryError>
where
    F: Fn() -> CaseResult + Send + Sync + 'static,
{
    GLOBAL.lock().register(suite, name, body)
}

/// Snapshot of the process-wide registry.
///
/// The snapshot owns its data, so cases can run without holding the
/// registry lock.
pub fn all_suites() -> CaseRegistry {
    GLOBAL.lock().clone()
}

/// Seal the process-wide registry and return a snapshot of it.
pub(crate) fn seal_global() -> CaseRegistry {
    let mut registry = GLOBAL.lock();
    registry.seal();
    registry.clone()
}
