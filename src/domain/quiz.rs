use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// One recorded answer: a value on the question's numeric scale, or one of
/// its enumerated options.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AnswerValue {
    Number(f64),
    Choice(String),
}

impl AnswerValue {
    pub fn as_number(&self) -> Option<f64> {
        match self {
            AnswerValue::Number(n) => Some(*n),
            AnswerValue::Choice(_) => None,
        }
    }
}

impl fmt::Display for AnswerValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AnswerValue::Number(n) if n.fract() == 0.0 => write!(f, "{}", *n as i64),
            AnswerValue::Number(n) => write!(f, "{n}"),
            AnswerValue::Choice(s) => write!(f, "{s}"),
        }
    }
}

/// Input constraint declared on a question. Validation happens upstream in
/// the rendering adapter; the sequencer receives only values that fit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Constraint {
    Scale {
        min: f64,
        max: f64,
        step: f64,
        unit: Option<&'static str>,
    },
    OneOf(&'static [&'static str]),
}

impl Constraint {
    pub fn fits(&self, value: &AnswerValue) -> bool {
        match (self, value) {
            (Constraint::Scale { min, max, step, .. }, AnswerValue::Number(n)) => {
                if !n.is_finite() || n < min || n > max {
                    return false;
                }
                let steps = (n - min) / step;
                (steps - steps.round()).abs() < 1e-9
            }
            (Constraint::OneOf(options), AnswerValue::Choice(s)) => {
                options.iter().any(|o| o.eq_ignore_ascii_case(s))
            }
            _ => false,
        }
    }

    /// Human-readable range/options line for prompts.
    pub fn describe(&self) -> String {
        match self {
            Constraint::Scale {
                min,
                max,
                unit: Some(unit),
                ..
            } => format!("{min}-{max} {unit}"),
            Constraint::Scale { min, max, .. } => format!("{min}-{max} scale"),
            Constraint::OneOf(options) => options.join(" / "),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Question {
    pub key: &'static str,
    pub text: &'static str,
    pub hint: Option<&'static str>,
    pub constraint: Constraint,
}

const fn scale(min: f64, max: f64, step: f64, unit: Option<&'static str>) -> Constraint {
    Constraint::Scale {
        min,
        max,
        step,
        unit,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Comparison {
    AtLeast,
    AtMost,
}

/// Inserts one predefined follow-up question right after the question that
/// triggered it, when the recorded answer crosses the threshold.
#[derive(Debug, Clone)]
pub struct AdaptiveRule {
    pub trigger: &'static str,
    pub comparison: Comparison,
    pub threshold: f64,
    pub follow_up: Question,
}

impl AdaptiveRule {
    fn matches(&self, key: &str, value: &AnswerValue) -> bool {
        if key != self.trigger {
            return false;
        }
        let Some(n) = value.as_number() else {
            return false;
        };
        match self.comparison {
            Comparison::AtLeast => n >= self.threshold,
            Comparison::AtMost => n <= self.threshold,
        }
    }
}

/// Base question sequence, aligned with the prediction model's features.
pub static BASE_QUESTIONS: Lazy<Vec<Question>> = Lazy::new(|| {
    vec![
        Question {
            key: "sleep",
            text: "How many hours did you sleep last night?",
            hint: None,
            constraint: scale(0.0, 12.0, 0.5, Some("hours")),
        },
        Question {
            key: "stress",
            text: "How stressed do you feel right now?",
            hint: Some("0 = calm, 5 = very stressed"),
            constraint: scale(0.0, 5.0, 1.0, None),
        },
        Question {
            key: "screen",
            text: "How many hours did you spend on social media today?",
            hint: None,
            constraint: scale(0.0, 16.0, 0.5, Some("hours")),
        },
        Question {
            key: "focus",
            text: "How focused do you feel currently?",
            hint: Some("0 = scattered, 5 = sharp"),
            constraint: scale(0.0, 5.0, 1.0, None),
        },
        Question {
            key: "workHours",
            text: "How many hours did you work/study this week?",
            hint: None,
            constraint: scale(0.0, 100.0, 1.0, Some("hours")),
        },
        Question {
            key: "loneliness",
            text: "Do you feel lonely today?",
            hint: Some("0 = not at all, 5 = very lonely"),
            constraint: scale(0.0, 5.0, 1.0, None),
        },
        Question {
            key: "socialSupport",
            text: "Do you feel supported by friends/family?",
            hint: Some("0 = not at all, 5 = fully supported"),
            constraint: scale(0.0, 5.0, 1.0, None),
        },
    ]
});

/// Canonical adaptivity rule set: one follow-up per trigger key.
pub static ADAPTIVE_RULES: Lazy<Vec<AdaptiveRule>> = Lazy::new(|| {
    vec![
        AdaptiveRule {
            trigger: "stress",
            comparison: Comparison::AtLeast,
            threshold: 4.0,
            follow_up: Question {
                key: "anxiety",
                text: "Do you feel emotionally overwhelmed?",
                hint: Some("0 = not at all, 5 = completely"),
                constraint: scale(0.0, 5.0, 1.0, None),
            },
        },
        AdaptiveRule {
            trigger: "sleep",
            comparison: Comparison::AtMost,
            threshold: 2.0,
            follow_up: Question {
                key: "fatigue",
                text: "Do you feel brain fog or extreme tiredness?",
                hint: Some("0 = not at all, 5 = completely"),
                constraint: scale(0.0, 5.0, 1.0, None),
            },
        },
        AdaptiveRule {
            trigger: "loneliness",
            comparison: Comparison::AtLeast,
            threshold: 3.0,
            follow_up: Question {
                key: "isolation",
                text: "Are you avoiding social interactions?",
                hint: Some("0 = not at all, 5 = completely"),
                constraint: scale(0.0, 5.0, 1.0, None),
            },
        },
    ]
});

pub type AnswerMap = BTreeMap<String, AnswerValue>;

/// Result of one `answer` transition.
#[derive(Debug, Clone, PartialEq)]
pub enum Step {
    Next,
    Completed(AnswerMap),
}

/// Quiz sequencer. Walks an ordered question list, records one answer per
/// key (overwrite on re-answer), and grows the list with follow-ups.
///
/// Invariants: the active index always addresses a valid element while in
/// progress; insertions happen only ahead of the current position, so
/// already-answered questions are never re-ordered; the sequence only grows.
#[derive(Debug, Clone)]
pub struct QuizRun {
    questions: Vec<Question>,
    rules: Vec<AdaptiveRule>,
    answers: AnswerMap,
    index: usize,
}

impl QuizRun {
    pub fn new() -> Self {
        Self::with_questions(BASE_QUESTIONS.clone(), ADAPTIVE_RULES.clone())
    }

    pub fn with_questions(questions: Vec<Question>, rules: Vec<AdaptiveRule>) -> Self {
        Self {
            questions,
            rules,
            answers: AnswerMap::new(),
            index: 0,
        }
    }

    /// The question awaiting an answer, or `None` once completed.
    pub fn current(&self) -> Option<&Question> {
        self.questions.get(self.index)
    }

    pub fn is_completed(&self) -> bool {
        self.index >= self.questions.len()
    }

    /// 1-based position and current sequence length, for progress display.
    pub fn progress(&self) -> (usize, usize) {
        (self.index + 1, self.questions.len())
    }

    pub fn answers(&self) -> &AnswerMap {
        &self.answers
    }

    /// Last-recorded value for a key, used to redisplay after `back`.
    pub fn recorded(&self, key: &str) -> Option<&AnswerValue> {
        self.answers.get(key)
    }

    /// Records a pre-validated answer for the current question, inserts at
    /// most one follow-up directly after it, and advances. No-op once
    /// completed.
    pub fn answer(&mut self, value: AnswerValue) -> Step {
        let Some(question) = self.questions.get(self.index) else {
            return Step::Completed(self.answers.clone());
        };
        debug_assert!(
            question.constraint.fits(&value),
            "quiz sequencer expects pre-validated input for '{}'",
            question.key
        );

        let key = question.key;
        self.answers.insert(key.to_string(), value.clone());

        // First matching rule wins; skip follow-ups already in the sequence
        // so re-answering after `back` cannot duplicate a question.
        if let Some(rule) = self.rules.iter().find(|r| r.matches(key, &value)) {
            let present = self.questions.iter().any(|q| q.key == rule.follow_up.key);
            if !present {
                self.questions.insert(self.index + 1, rule.follow_up.clone());
            }
        }

        self.index += 1;
        if self.index < self.questions.len() {
            Step::Next
        } else {
            Step::Completed(self.answers.clone())
        }
    }

    /// Steps back to the previous question without touching the answer map
    /// or the sequence. Returns false at the first question or when
    /// completed.
    pub fn back(&mut self) -> bool {
        if self.index == 0 || self.is_completed() {
            return false;
        }
        self.index -= 1;
        true
    }
}

impl Default for QuizRun {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn q(key: &'static str, text: &'static str) -> Question {
        Question {
            key,
            text,
            hint: None,
            constraint: scale(0.0, 5.0, 1.0, None),
        }
    }

    fn n(v: f64) -> AnswerValue {
        AnswerValue::Number(v)
    }

    fn stress_rule() -> AdaptiveRule {
        AdaptiveRule {
            trigger: "stress",
            comparison: Comparison::AtLeast,
            threshold: 4.0,
            follow_up: q("anxiety", "Do you feel emotionally overwhelmed?"),
        }
    }

    #[test]
    fn high_stress_inserts_follow_up_before_remaining_questions() {
        let base = vec![q("sleep", "sleep?"), q("stress", "stress?"), q("mood", "mood?")];
        let mut run = QuizRun::with_questions(base, vec![stress_rule()]);

        assert_eq!(run.answer(n(3.0)), Step::Next);
        assert_eq!(run.current().unwrap().key, "stress");

        assert_eq!(run.answer(n(5.0)), Step::Next);
        assert_eq!(run.current().unwrap().key, "anxiety");
        assert_eq!(run.progress(), (3, 4));

        assert_eq!(run.answer(n(4.0)), Step::Next);
        assert_eq!(run.current().unwrap().key, "mood");
    }

    #[test]
    fn below_threshold_does_not_insert() {
        let base = vec![q("stress", "stress?"), q("mood", "mood?")];
        let mut run = QuizRun::with_questions(base, vec![stress_rule()]);

        assert_eq!(run.answer(n(3.0)), Step::Next);
        assert_eq!(run.current().unwrap().key, "mood");
        assert_eq!(run.progress(), (2, 2));
    }

    #[test]
    fn low_sleep_inserts_fatigue_directly_after_sleep() {
        let mut run = QuizRun::new();
        assert_eq!(run.current().unwrap().key, "sleep");
        run.answer(n(1.0));
        assert_eq!(run.current().unwrap().key, "fatigue");
    }

    #[test]
    fn full_run_with_high_stress_grows_to_eight_questions() {
        let mut run = QuizRun::new();
        let mut presented = Vec::new();
        let mut last = Step::Next;
        while let Some(question) = run.current().cloned() {
            presented.push(question.key);
            // High stress, everything else mid-scale.
            let value = if question.key == "stress" { 5.0 } else { 3.0 };
            last = run.answer(n(value));
        }
        // loneliness=3 also triggers its rule, so two follow-ups total.
        assert_eq!(presented.len(), 9);
        assert!(presented.contains(&"anxiety"));
        assert!(presented.contains(&"isolation"));
        assert!(!presented.contains(&"fatigue"));

        let Step::Completed(answers) = last else {
            panic!("run did not complete");
        };
        assert_eq!(answers.len(), presented.len());
        for key in presented {
            assert!(answers.contains_key(key), "missing answer for {key}");
        }
    }

    #[test]
    fn insertion_never_touches_questions_at_or_before_current() {
        let base = vec![q("sleep", "sleep?"), q("stress", "stress?"), q("mood", "mood?")];
        let mut run = QuizRun::with_questions(base, vec![stress_rule()]);
        run.answer(n(2.0));
        let before: Vec<_> = run.questions[..=run.index]
            .iter()
            .map(|x| (x.key, x.text))
            .collect();
        run.answer(n(5.0));
        let after: Vec<_> = run.questions[..before.len()]
            .iter()
            .map(|x| (x.key, x.text))
            .collect();
        assert_eq!(before, after);
    }

    #[test]
    fn reanswer_overwrites_without_duplicating_entries_or_questions() {
        let base = vec![q("stress", "stress?"), q("mood", "mood?")];
        let mut run = QuizRun::with_questions(base, vec![stress_rule()]);

        run.answer(n(5.0));
        assert!(run.back());
        assert_eq!(run.current().unwrap().key, "stress");
        assert_eq!(run.recorded("stress"), Some(&n(5.0)));

        run.answer(n(4.0));
        assert_eq!(run.recorded("stress"), Some(&n(4.0)));
        // anxiety was already inserted; no second copy.
        let anxiety_count = run.questions.iter().filter(|x| x.key == "anxiety").count();
        assert_eq!(anxiety_count, 1);
        assert_eq!(run.progress(), (2, 3));
    }

    #[test]
    fn back_refuses_at_start_and_after_completion() {
        let mut run = QuizRun::with_questions(vec![q("mood", "mood?")], vec![]);
        assert!(!run.back());
        assert!(matches!(run.answer(n(2.0)), Step::Completed(_)));
        assert!(run.is_completed());
        assert!(!run.back());
    }

    #[test]
    fn answer_after_completion_is_a_no_op() {
        let mut run = QuizRun::with_questions(vec![q("mood", "mood?")], vec![]);
        run.answer(n(2.0));
        let step = run.answer(n(4.0));
        let Step::Completed(answers) = step else {
            panic!("expected completed");
        };
        assert_eq!(answers.get("mood"), Some(&n(2.0)));
        assert_eq!(answers.len(), 1);
    }

    #[test]
    fn scale_constraint_checks_range_and_step() {
        let c = scale(0.0, 12.0, 0.5, Some("hours"));
        assert!(c.fits(&n(7.5)));
        assert!(c.fits(&n(0.0)));
        assert!(c.fits(&n(12.0)));
        assert!(!c.fits(&n(12.5)));
        assert!(!c.fits(&n(-1.0)));
        assert!(!c.fits(&n(3.3)));
        assert!(!c.fits(&AnswerValue::Choice("yes".into())));
    }

    #[test]
    fn one_of_constraint_is_case_insensitive() {
        let c = Constraint::OneOf(&["Yes", "No"]);
        assert!(c.fits(&AnswerValue::Choice("yes".into())));
        assert!(!c.fits(&AnswerValue::Choice("maybe".into())));
        assert!(!c.fits(&n(1.0)));
    }
}
