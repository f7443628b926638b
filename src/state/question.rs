//! Random multiple-choice question generation over a [`CountryPool`].

use rand::Rng;

use crate::state::game::{ANSWER_COUNT, Country, CountryPool, Question};

/// Fixed prompt used for flag questions.
pub const FLAG_QUESTION: &str = "Which country does this flag belong to?";

/// What the player is asked to identify.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuestionKind {
    /// "<capital> is capital of" the subject country.
    Capital,
    /// Which country owns the displayed flag.
    Flag,
}

/// Draw a question uniformly: kind, subject, answer slot, then distractors.
///
/// A subject without capital data always yields a [`QuestionKind::Flag`] question.
pub fn generate_question<R: Rng>(pool: &CountryPool, rng: &mut R) -> Question {
    let kind = if rng.random_bool(0.5) {
        QuestionKind::Capital
    } else {
        QuestionKind::Flag
    };
    let subject = rng.random_range(0..pool.len());
    let index_answer = rng.random_range(0..ANSWER_COUNT);

    build_question(pool, kind, subject, index_answer, rng)
}

/// Build a question for a given kind, subject and answer slot, drawing only the distractors.
///
/// Out-of-range `subject` or `index_answer` values are clamped into the pool and answer ranges.
pub fn build_question<R: Rng>(
    pool: &CountryPool,
    kind: QuestionKind,
    subject: usize,
    index_answer: usize,
    rng: &mut R,
) -> Question {
    let subject = subject.min(pool.len() - 1);
    let index_answer = index_answer.min(ANSWER_COUNT - 1);
    let country = country_at(pool, subject);

    let answers = std::array::from_fn(|slot| {
        if slot == index_answer {
            country.name.clone()
        } else {
            country_at(pool, draw_distractor(pool.len(), subject, rng))
                .name
                .clone()
        }
    });

    match (kind, country.capital()) {
        (QuestionKind::Capital, Some(capital)) => Question {
            text: format!("{capital} is capital of"),
            flag: None,
            answers,
            index_answer,
        },
        _ => Question {
            text: FLAG_QUESTION.to_string(),
            flag: Some(country.flag.clone()),
            answers,
            index_answer,
        },
    }
}

/// Uniform draw over `0..len` excluding `subject`.
fn draw_distractor<R: Rng>(len: usize, subject: usize, rng: &mut R) -> usize {
    let drawn = rng.random_range(0..len - 1);
    if drawn >= subject { drawn + 1 } else { drawn }
}

fn country_at(pool: &CountryPool, index: usize) -> &Country {
    // Indices are always clamped to the pool, which is never empty.
    &pool.as_ref()[index]
}

#[cfg(test)]
mod tests {
    use rand::{SeedableRng, rngs::StdRng};

    use super::*;

    fn country(name: &str, capital: Option<&str>) -> Country {
        Country {
            name: name.into(),
            flag: format!("https://flagcdn.com/{}.svg", name.to_lowercase()),
            capitals: capital.map(|c| vec![c.to_string()]).unwrap_or_default(),
        }
    }

    fn europe() -> CountryPool {
        CountryPool::new(vec![
            country("France", Some("Paris")),
            country("Germany", Some("Berlin")),
            country("Italy", Some("Rome")),
            country("Spain", Some("Madrid")),
        ])
        .unwrap()
    }

    #[test]
    fn forced_capital_question_places_subject_at_answer_slot() {
        let pool = europe();
        let mut rng = StdRng::seed_from_u64(7);

        let question = build_question(&pool, QuestionKind::Capital, 0, 2, &mut rng);

        assert_eq!(question.text, "Paris is capital of");
        assert_eq!(question.flag, None);
        assert_eq!(question.index_answer, 2);
        assert_eq!(question.answers[2], "France");
        for (slot, answer) in question.answers.iter().enumerate() {
            if slot != 2 {
                assert_ne!(answer, "France");
            }
        }
    }

    #[test]
    fn forced_flag_question_uses_subject_flag() {
        let pool = europe();
        let mut rng = StdRng::seed_from_u64(11);

        let question = build_question(&pool, QuestionKind::Flag, 3, 0, &mut rng);

        assert_eq!(question.text, FLAG_QUESTION);
        assert_eq!(question.flag.as_deref(), Some("https://flagcdn.com/spain.svg"));
        assert_eq!(question.answers[0], "Spain");
    }

    #[test]
    fn subject_without_capital_falls_back_to_flag() {
        let pool = CountryPool::new(vec![
            country("Antarctica", None),
            country("Germany", Some("Berlin")),
            country("Italy", Some("Rome")),
            country("Spain", Some("Madrid")),
        ])
        .unwrap();
        let mut rng = StdRng::seed_from_u64(3);

        let question = build_question(&pool, QuestionKind::Capital, 0, 1, &mut rng);

        assert_eq!(question.text, FLAG_QUESTION);
        assert_eq!(
            question.flag.as_deref(),
            Some("https://flagcdn.com/antarctica.svg")
        );
        assert_eq!(question.answers[1], "Antarctica");
    }

    #[test]
    fn generated_questions_hold_invariants() {
        let pool = CountryPool::new(vec![
            country("France", Some("Paris")),
            country("Germany", Some("Berlin")),
            country("Italy", Some("Rome")),
            country("Spain", Some("Madrid")),
            country("Bouvet Island", None),
            country("Japan", Some("Tokyo")),
        ])
        .unwrap();
        let mut rng = StdRng::seed_from_u64(2024);

        for _ in 0..500 {
            let question = generate_question(&pool, &mut rng);
            assert!(question.index_answer < ANSWER_COUNT);

            let subject = &question.answers[question.index_answer];
            let occurrences = question.answers.iter().filter(|a| *a == subject).count();
            assert_eq!(occurrences, 1, "subject must not be reused as a distractor");

            match question.flag {
                Some(_) => assert_eq!(question.text, FLAG_QUESTION),
                None => {
                    let capital = pool
                        .as_ref()
                        .iter()
                        .find(|c| &c.name == subject)
                        .and_then(Country::capital)
                        .expect("capital question needs a capital");
                    assert_eq!(question.text, format!("{capital} is capital of"));
                }
            }
            if question.flag.is_none() {
                assert_ne!(subject, "Bouvet Island");
            }
        }
    }

    #[test]
    fn same_seed_reproduces_the_same_questions() {
        let pool = europe();
        let mut first = StdRng::seed_from_u64(99);
        let mut second = StdRng::seed_from_u64(99);

        for _ in 0..20 {
            assert_eq!(
                generate_question(&pool, &mut first),
                generate_question(&pool, &mut second)
            );
        }
    }

    #[test]
    fn both_kinds_are_drawn() {
        let pool = europe();
        let mut rng = StdRng::seed_from_u64(5);
        let flags = (0..200)
            .map(|_| generate_question(&pool, &mut rng))
            .filter(|q| q.flag.is_some())
            .count();
        assert!(flags > 0 && flags < 200);
    }
}
