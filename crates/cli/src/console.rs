//! Verbosity-gated stderr output.
//!
//! Handed to command code explicitly; stdout stays reserved for --json
//! payloads so pipelines can consume them.

/// 0 = errors and warnings only, 1 = progress, 2 = debug detail.
#[derive(Debug, Clone, Copy)]
pub struct Console {
    verbosity: u8,
}

impl Console {
    pub fn new(verbosity: u8) -> Self {
        Self { verbosity }
    }

    /// Printed at every verbosity level.
    pub fn error(&self, msg: &str) {
        eprintln!("error: {msg}");
    }

    /// Printed at every verbosity level, like errors.
    pub fn warn(&self, msg: &str) {
        eprintln!("warning: {msg}");
    }

    pub fn info(&self, msg: &str) {
        if self.verbosity >= 1 {
            eprintln!("{msg}");
        }
    }

    pub fn debug(&self, msg: &str) {
        if self.verbosity >= 2 {
            eprintln!("{msg}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verbosity_levels_are_ordered() {
        // Smoke check that all levels construct; output itself is covered
        // by the CLI integration tests.
        for v in 0..=2 {
            let console = Console::new(v);
            console.error("e");
            console.warn("w");
            console.info("i");
            console.debug("d");
        }
    }
}
