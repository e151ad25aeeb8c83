//! Arithmetic question generation
//!
//! Operand range and operator set both grow with the phase.

use rand::Rng;
use serde::{Deserialize, Serialize};

/// Arithmetic operator carried by a question
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Operator {
    Addition,
    Subtraction,
    Multiplication,
}

impl Operator {
    /// Symbol shown between the operands
    pub fn symbol(&self) -> &'static str {
        match self {
            Operator::Addition => "+",
            Operator::Subtraction => "-",
            Operator::Multiplication => "×",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Operator::Addition => "addition",
            Operator::Subtraction => "subtraction",
            Operator::Multiplication => "multiplication",
        }
    }

    pub fn apply(&self, a: i64, b: i64) -> i64 {
        match self {
            Operator::Addition => a + b,
            // May go negative; the player has to type the sign
            Operator::Subtraction => a - b,
            Operator::Multiplication => a * b,
        }
    }
}

/// A generated question with its expected answer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    pub text: String,
    pub answer: i64,
    pub operator: Operator,
    pub lhs: i64,
    pub rhs: i64,
}

impl Question {
    pub fn new(lhs: i64, rhs: i64, operator: Operator) -> Self {
        Self {
            text: format!("{} {} {}", lhs, operator.symbol(), rhs),
            answer: operator.apply(lhs, rhs),
            operator,
            lhs,
            rhs,
        }
    }
}

/// Largest operand for a phase (operands are drawn from `1..=5*phase`)
pub fn max_operand(phase: u32) -> i64 {
    5 * phase.max(1) as i64
}

/// Pick the operator for a phase
///
/// 1: addition, 2: addition or subtraction, 3: multiplication,
/// 4+: any of the three. Never division.
fn pick_operator<R: Rng>(phase: u32, rng: &mut R) -> Operator {
    match phase {
        0 | 1 => Operator::Addition,
        2 => {
            if rng.random_bool(0.5) {
                Operator::Addition
            } else {
                Operator::Subtraction
            }
        }
        3 => Operator::Multiplication,
        _ => match rng.random_range(0..3) {
            0 => Operator::Addition,
            1 => Operator::Subtraction,
            _ => Operator::Multiplication,
        },
    }
}

/// Generate a question for the given phase
pub fn generate_question<R: Rng>(phase: u32, rng: &mut R) -> Question {
    let max = max_operand(phase);
    let lhs = rng.random_range(1..=max);
    let rhs = rng.random_range(1..=max);
    let operator = pick_operator(phase, rng);
    Question::new(lhs, rhs, operator)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_question_text_format() {
        assert_eq!(Question::new(2, 3, Operator::Addition).text, "2 + 3");
        assert_eq!(Question::new(4, 9, Operator::Subtraction).text, "4 - 9");
        assert_eq!(Question::new(6, 7, Operator::Multiplication).text, "6 × 7");
    }

    #[test]
    fn test_subtraction_can_be_negative() {
        let q = Question::new(2, 7, Operator::Subtraction);
        assert_eq!(q.answer, -5);
    }

    #[test]
    fn test_phase_operator_sets() {
        let mut rng = Pcg32::seed_from_u64(7);
        for _ in 0..200 {
            assert_eq!(generate_question(1, &mut rng).operator, Operator::Addition);
            assert_eq!(
                generate_question(3, &mut rng).operator,
                Operator::Multiplication
            );
            assert_ne!(
                generate_question(2, &mut rng).operator,
                Operator::Multiplication
            );
        }
    }

    #[test]
    fn test_late_phases_use_every_operator() {
        let mut rng = Pcg32::seed_from_u64(42);
        let ops: Vec<Operator> = (0..300)
            .map(|_| generate_question(5, &mut rng).operator)
            .collect();
        assert!(ops.contains(&Operator::Addition));
        assert!(ops.contains(&Operator::Subtraction));
        assert!(ops.contains(&Operator::Multiplication));
    }

    proptest! {
        #[test]
        fn answer_matches_operator_and_operands(phase in 1u32..40, seed in any::<u64>()) {
            let mut rng = Pcg32::seed_from_u64(seed);
            let q = generate_question(phase, &mut rng);
            let max = 5 * phase as i64;
            prop_assert!((1..=max).contains(&q.lhs));
            prop_assert!((1..=max).contains(&q.rhs));
            prop_assert_eq!(q.answer, q.operator.apply(q.lhs, q.rhs));
            prop_assert_eq!(
                q.text.clone(),
                format!("{} {} {}", q.lhs, q.operator.symbol(), q.rhs)
            );
        }
    }
}
