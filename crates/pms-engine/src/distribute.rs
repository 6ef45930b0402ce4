//! Tagging workload distribution.
//!
//! Every student receives exactly `quota` distinct questions they did not
//! author. Slots are a multiset of question indices sized to fill every
//! quota exactly; students draw from the shuffled pool in roster order, and
//! anyone left short is filled by exchanging slots with other students.

use std::collections::{BTreeMap, HashSet, VecDeque};

use pms_config::{DistributionConfig, ExtraSlotFill};
use pms_core::artifacts::TagDistribution;
use pms_core::entities::Question;
use rand::Rng;
use rand::seq::SliceRandom;

use crate::error::{DeficiencyReport, EngineError, StudentDeficiency};

/// Slot arithmetic for one panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlotPlan {
    /// Questions each student tags.
    pub quota: usize,
    pub total_slots: usize,
    /// Copies of every question in the pool.
    pub repetitions: usize,
    /// Slots left over after the even repetition.
    pub extra_slots: usize,
}

impl SlotPlan {
    /// `quota = min(questions - required, max_per_student)`.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InsufficientQuestions`] when the panel has no
    /// questions or the quota works out to zero.
    pub fn new(
        panel_id: &str,
        questions: usize,
        students: usize,
        required: u32,
        max_per_student: usize,
    ) -> Result<Self, EngineError> {
        let insufficient = || EngineError::InsufficientQuestions {
            panel_id: panel_id.to_string(),
            questions,
            required,
        };
        if questions == 0 {
            return Err(insufficient());
        }
        let required = usize::try_from(required).unwrap_or(usize::MAX);
        let quota = questions.saturating_sub(required).min(max_per_student);
        if quota == 0 {
            return Err(insufficient());
        }
        let total_slots = quota * students;
        Ok(Self {
            quota,
            total_slots,
            repetitions: total_slots / questions,
            extra_slots: total_slots % questions,
        })
    }
}

/// Assign tagging questions to every student.
///
/// A violating slot goes to the back of the pool and the pick retries, at
/// most `quota` times. A student whose bucket comes up short returns the
/// draws and reshuffles, at most `max_student_attempts` times, keeping the
/// last short draw. Short buckets are then repaired from the leftover slots
/// through exchange chains with other students. Students still short after
/// that are collected into one deficiency report; no partial result is
/// returned.
///
/// # Errors
///
/// [`EngineError::InsufficientQuestions`] if there is nothing to distribute,
/// [`EngineError::Unsatisfiable`] if any student cannot be filled.
pub fn distribute<R: Rng + ?Sized>(
    panel_id: &str,
    questions: &[Question],
    students: &[String],
    required: u32,
    config: &DistributionConfig,
    rng: &mut R,
) -> Result<TagDistribution, EngineError> {
    let plan = SlotPlan::new(
        panel_id,
        questions.len(),
        students.len(),
        required,
        usize::try_from(config.max_questions_per_student).unwrap_or(usize::MAX),
    )?;
    tracing::info!(
        panel_id,
        questions = questions.len(),
        students = students.len(),
        quota = plan.quota,
        total_slots = plan.total_slots,
        extra_slots = plan.extra_slots,
        "distributing tag questions"
    );

    let eligible_counts: Vec<usize> = students
        .iter()
        .map(|s| eligible_count(questions, s))
        .collect();
    let impossible: Vec<StudentDeficiency> = students
        .iter()
        .zip(&eligible_counts)
        .filter(|&(_, &eligible)| eligible < plan.quota)
        .map(|(student, &eligible)| StudentDeficiency {
            student_id: student.clone(),
            assigned: 0,
            eligible,
        })
        .collect();
    if !impossible.is_empty() {
        return Err(EngineError::Unsatisfiable(DeficiencyReport {
            panel_id: panel_id.to_string(),
            quota: plan.quota,
            deficient: impossible,
        }));
    }

    let mut pool = build_pool(questions.len(), &plan, config.extra_slot_fill, rng);

    let mut buckets: Vec<Vec<usize>> = Vec::with_capacity(students.len());
    for student in students {
        let mut bucket = Vec::new();
        for attempt in 1..=config.max_student_attempts {
            bucket = draw_bucket(&mut pool, questions, student, plan.quota);
            if bucket.len() == plan.quota || attempt == config.max_student_attempts {
                break;
            }
            tracing::debug!(
                student_id = %student,
                attempt,
                drawn = bucket.len(),
                "bucket short; returning draws and reshuffling"
            );
            pool.extend(bucket.drain(..));
            pool.make_contiguous().shuffle(rng);
        }
        buckets.push(bucket);
    }

    let mut free = vec![0_usize; questions.len()];
    for slot in pool {
        free[slot] += 1;
    }
    let repaired = repair(&mut buckets, &mut free, questions, students, plan.quota);
    if repaired > 0 {
        tracing::debug!(repaired, "filled short buckets by exchanging slots");
    }

    let mut distribution = TagDistribution::default();
    let mut deficient = Vec::new();
    for ((student, bucket), &eligible) in students.iter().zip(buckets).zip(&eligible_counts) {
        if bucket.len() == plan.quota {
            let assigned: BTreeMap<String, String> = bucket
                .into_iter()
                .map(|i| (questions[i].id.clone(), questions[i].text.clone()))
                .collect();
            distribution.assign(student.clone(), assigned);
        } else {
            tracing::warn!(student_id = %student, assigned = bucket.len(), quota = plan.quota, "student left short");
            deficient.push(StudentDeficiency {
                student_id: student.clone(),
                assigned: bucket.len(),
                eligible,
            });
        }
    }

    if deficient.is_empty() {
        Ok(distribution)
    } else {
        Err(EngineError::Unsatisfiable(DeficiencyReport {
            panel_id: panel_id.to_string(),
            quota: plan.quota,
            deficient,
        }))
    }
}

fn eligible_count(questions: &[Question], student_id: &str) -> usize {
    questions
        .iter()
        .filter(|q| q.author_id != student_id)
        .map(|q| q.id.as_str())
        .collect::<HashSet<_>>()
        .len()
}

/// The shuffled slot multiset.
fn build_pool<R: Rng + ?Sized>(
    question_count: usize,
    plan: &SlotPlan,
    fill: ExtraSlotFill,
    rng: &mut R,
) -> VecDeque<usize> {
    let mut slots = Vec::with_capacity(plan.total_slots);
    for index in 0..question_count {
        slots.extend(std::iter::repeat_n(index, plan.repetitions));
    }
    match fill {
        ExtraSlotFill::Front => slots.extend(0..plan.extra_slots),
        ExtraSlotFill::Random => {
            let indices: Vec<usize> = (0..question_count).collect();
            slots.extend(indices.choose_multiple(rng, plan.extra_slots).copied());
        }
    }
    slots.shuffle(rng);
    slots.into()
}

/// Draw up to `quota` valid slots for one student.
///
/// A slot the student authored or already holds goes to the back of the
/// pool. A pick gets one try plus `quota` retries; after that it is
/// abandoned and the bucket comes back short.
fn draw_bucket(
    pool: &mut VecDeque<usize>,
    questions: &[Question],
    student_id: &str,
    quota: usize,
) -> Vec<usize> {
    let mut bucket: Vec<usize> = Vec::with_capacity(quota);
    let mut held: HashSet<&str> = HashSet::with_capacity(quota);

    'picks: for _ in 0..quota {
        let mut rotations = 0;
        loop {
            let Some(slot) = pool.pop_front() else {
                break 'picks;
            };
            let question = &questions[slot];
            if question.author_id != student_id && !held.contains(question.id.as_str()) {
                held.insert(question.id.as_str());
                bucket.push(slot);
                break;
            }
            pool.push_back(slot);
            rotations += 1;
            if rotations > quota {
                break 'picks;
            }
        }
    }
    bucket
}

/// Whether `student` may take question `q` next to what `bucket` already holds.
fn can_take(questions: &[Question], bucket: &[usize], student: &str, q: usize) -> bool {
    questions[q].author_id != student && bucket.iter().all(|&held| questions[held].id != questions[q].id)
}

/// Fill short buckets from the leftover slots in `free`.
///
/// A short student takes a leftover slot directly when it can. Otherwise
/// slots are passed along a chain of students: the short student takes a
/// question from a filled one, who replaces it with another question, and so
/// on until some student in the chain takes a leftover slot. Sweeps repeat
/// until no short student gains a slot, at which point no chain exists for
/// anyone. Returns the number of slots placed.
fn repair(
    buckets: &mut [Vec<usize>],
    free: &mut [usize],
    questions: &[Question],
    students: &[String],
    quota: usize,
) -> usize {
    let mut placed = 0;
    loop {
        let mut progressed = false;
        for short in 0..buckets.len() {
            while buckets[short].len() < quota
                && augment(short, buckets, free, questions, students)
            {
                placed += 1;
                progressed = true;
            }
        }
        if !progressed {
            return placed;
        }
    }
}

/// Breadth-first search for one exchange chain starting at student `short`.
///
/// Student nodes expand to every question they could take; question nodes
/// expand to every student holding them, who could give them up. The
/// search ends at the first question that still has a leftover slot.
fn augment(
    short: usize,
    buckets: &mut [Vec<usize>],
    free: &mut [usize],
    questions: &[Question],
    students: &[String],
) -> bool {
    // Student who would take each question, and the question each student
    // would give up.
    let mut taker: Vec<Option<usize>> = vec![None; questions.len()];
    let mut given: Vec<Option<usize>> = vec![None; students.len()];
    let mut seen_student = vec![false; students.len()];
    seen_student[short] = true;

    let mut queue = VecDeque::from([short]);
    let mut end = None;
    'search: while let Some(student) = queue.pop_front() {
        for q in 0..questions.len() {
            if taker[q].is_some() || !can_take(questions, &buckets[student], &students[student], q) {
                continue;
            }
            taker[q] = Some(student);
            if free[q] > 0 {
                end = Some(q);
                break 'search;
            }
            for (holder, bucket) in buckets.iter().enumerate() {
                if !seen_student[holder] && bucket.contains(&q) {
                    seen_student[holder] = true;
                    given[holder] = Some(q);
                    queue.push_back(holder);
                }
            }
        }
    }

    let Some(mut q) = end else {
        return false;
    };
    free[q] -= 1;
    while let Some(student) = taker[q] {
        buckets[student].push(q);
        let Some(released) = given[student] else {
            break;
        };
        buckets[student].retain(|&held| held != released);
        q = released;
    }
    true
}
