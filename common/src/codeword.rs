use crate::config::CodewordConfig;

// outcome of one codeword entry
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Verdict {
    // the link may be revealed
    Accepted,

    // only checked on the first entry; these end the exchange
    ContainsDigits,
    BadLength(usize),

    // wrong word with attempts to spare
    Wrong { remaining: u32 },

    // wrong word on the last attempt
    Exhausted,
}

// case and spaces do not matter
pub fn normalize(input: &str) -> String {
    input
        .chars()
        .filter(|c| *c != ' ')
        .flat_map(char::to_lowercase)
        .collect()
}

// codeword gate
//
// one exchange with a visitor, from the first prompt to either the reveal or
// giving up.  the first entry is sanity-checked (no digits, sensible length)
// before it counts as an attempt; later entries are only compared
#[derive(Clone, Debug)]
pub struct CodewordGate {
    expected: String,
    max_attempts: u32,
    max_len: usize,
    attempts: u32,
}

impl CodewordGate {
    pub fn new(config: &CodewordConfig) -> Self {
        CodewordGate {
            expected: normalize(&config.expected),
            max_attempts: config.max_attempts.max(1),
            max_len: config.max_len,
            attempts: 0,
        }
    }

    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    pub fn submit(&mut self, input: &str) -> Verdict {
        if self.attempts == 0 {
            if input.chars().any(|c| c.is_ascii_digit()) {
                return Verdict::ContainsDigits;
            }

            let len = input.chars().count();
            if len < 1 || len > self.max_len {
                return Verdict::BadLength(len);
            }
        }

        self.attempts += 1;

        if normalize(input) == self.expected {
            Verdict::Accepted
        } else if self.attempts >= self.max_attempts {
            Verdict::Exhausted
        } else {
            Verdict::Wrong {
                remaining: self.max_attempts - self.attempts,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gate() -> CodewordGate {
        CodewordGate::new(&CodewordConfig::default())
    }

    #[test]
    fn normalize_ignores_case_and_spaces() {
        assert_eq!(normalize(" In Tern "), "intern");
        assert_eq!(normalize("ÄRGER"), "ärger");
    }

    #[test]
    fn accepts_on_first_try() {
        let mut gate = gate();
        assert_eq!(gate.submit("Intern"), Verdict::Accepted);
        assert_eq!(gate.attempts(), 1);
    }

    #[test]
    fn first_entry_is_sanity_checked() {
        assert_eq!(gate().submit("intern1"), Verdict::ContainsDigits);
        assert_eq!(gate().submit(""), Verdict::BadLength(0));
        assert_eq!(gate().submit("viel zu lang"), Verdict::BadLength(12));

        // umlauts count as one character each
        assert_eq!(gate().submit("ääääääääää"), Verdict::Wrong { remaining: 2 });
    }

    #[test]
    fn three_attempts_then_exhausted() {
        let mut gate = gate();

        assert_eq!(gate.submit("extern"), Verdict::Wrong { remaining: 2 });
        assert_eq!(gate.submit("chor"), Verdict::Wrong { remaining: 1 });

        // retries skip the sanity check and just compare
        assert_eq!(gate.submit("chor 2025 konzert"), Verdict::Exhausted);
    }

    #[test]
    fn late_success_counts() {
        let mut gate = gate();

        gate.submit("extern");
        assert_eq!(gate.submit("IN TERN"), Verdict::Accepted);
    }
}
