//! Workout plan generator - warmup, main block and cooldown from body part picks
//!
//! Rules:
//! - Warmup: one per selected part, ranked by relevance, wraps around when the pool runs out
//! - Main: ceil((minutes - 10) / 7) exercises spread over the parts, one contiguous block per part
//! - Cooldown: one general stretch, then one unused stretch per part

use chrono::{DateTime, Utc};
use rand::seq::SliceRandom;
use rand::Rng;
use thiserror::Error;
use tracing::debug;

use crate::exercises::{BodyPart, Category, Exercise, exercises_in};

pub const MIN_MINUTES: u32 = 20;
pub const MAX_MINUTES: u32 = 120;
pub const MINUTES_STEP: u32 = 5;
pub const DEFAULT_MINUTES: u32 = 45;

/// Minutes reserved for warmup and cooldown
const FIXED_BLOCK_MINUTES: u32 = 10;
/// Minutes budgeted per main exercise
const MINUTES_PER_MAIN: u32 = 7;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PlanError {
    #[error("At least one body part must be selected.")]
    NoBodyParts,
    #[error("Duration {0} min is outside 20-120 min.")]
    DurationOutOfRange(u32),
}

/// One generated session template
#[derive(Debug, Clone, PartialEq)]
pub struct WorkoutPlan {
    pub id: String,
    pub created_at: DateTime<Utc>,
    /// Warmup entries, then main, then cooldown. Never reordered.
    pub exercises: Vec<Exercise>,
    /// Requested duration in minutes
    pub total_duration: u32,
    pub selected_parts: Vec<BodyPart>,
}

impl WorkoutPlan {
    pub fn len(&self) -> usize {
        self.exercises.len()
    }

    pub fn is_empty(&self) -> bool {
        self.exercises.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Exercise> {
        self.exercises.get(index)
    }

    pub fn count_in(&self, category: Category) -> usize {
        self.exercises.iter().filter(|e| e.category == category).count()
    }
}

/// Number of main exercises for a session length (0 for very short sessions)
pub fn main_exercise_count(minutes: u32) -> usize {
    if minutes <= FIXED_BLOCK_MINUTES {
        return 0;
    }
    (minutes - FIXED_BLOCK_MINUTES).div_ceil(MINUTES_PER_MAIN) as usize
}

/// Split `total` over `parts` slots; the first `total % parts` slots get one extra
pub fn allocate(total: usize, parts: usize) -> Vec<usize> {
    if parts == 0 {
        return Vec::new();
    }
    let base = total / parts;
    let remainder = total % parts;
    (0..parts).map(|i| base + usize::from(i < remainder)).collect()
}

/// Build a plan for `parts` (in caller order) lasting about `minutes`.
///
/// `rng` only affects which main exercises are drawn and which general
/// cooldown is picked; counts and ordering are fully determined by the input.
pub fn generate_workout<R: Rng + ?Sized>(
    catalog: &[Exercise],
    parts: &[BodyPart],
    minutes: u32,
    rng: &mut R,
    now: DateTime<Utc>,
) -> Result<WorkoutPlan, PlanError> {
    if !(MIN_MINUTES..=MAX_MINUTES).contains(&minutes) {
        return Err(PlanError::DurationOutOfRange(minutes));
    }

    // Input is a set; keep first occurrence so caller order still decides allocation
    let mut selected: Vec<BodyPart> = Vec::with_capacity(parts.len());
    for part in parts {
        if !selected.contains(part) {
            selected.push(*part);
        }
    }
    if selected.is_empty() {
        return Err(PlanError::NoBodyParts);
    }

    let warmups = pick_warmups(catalog, &selected);
    let mains = pick_mains(catalog, &selected, minutes, rng);
    let cooldowns = pick_cooldowns(catalog, &selected, rng);

    debug!(
        warmup = warmups.len(),
        main = mains.len(),
        cooldown = cooldowns.len(),
        "Plan blocks selected"
    );

    let mut exercises = Vec::with_capacity(warmups.len() + mains.len() + cooldowns.len());
    exercises.extend(warmups);
    exercises.extend(mains);
    exercises.extend(cooldowns);

    Ok(WorkoutPlan {
        id: now.timestamp_millis().to_string(),
        created_at: now,
        exercises,
        total_duration: minutes,
        selected_parts: selected,
    })
}

fn pick_warmups(catalog: &[Exercise], parts: &[BodyPart]) -> Vec<Exercise> {
    let count = parts.len().max(1);
    let mut pool = exercises_in(catalog, Category::Warmup);
    if pool.is_empty() {
        return Vec::new();
    }

    // Stable: relevant first, catalog order kept within each group
    pool.sort_by_key(|e| !e.targets_any(parts));

    (0..count).map(|i| pool[i % pool.len()]).collect()
}

fn pick_mains<R: Rng + ?Sized>(
    catalog: &[Exercise],
    parts: &[BodyPart],
    minutes: u32,
    rng: &mut R,
) -> Vec<Exercise> {
    let total = main_exercise_count(minutes);
    let mut picked = Vec::with_capacity(total);

    for (part, count) in parts.iter().zip(allocate(total, parts.len())) {
        if count == 0 {
            continue;
        }

        let mut pool: Vec<Exercise> = catalog
            .iter()
            .filter(|e| e.category == Category::Main && e.targets(*part))
            .copied()
            .collect();
        pool.shuffle(rng);

        if pool.len() < count {
            debug!(?part, wanted = count, available = pool.len(), "Main pool underfilled");
        }
        picked.extend(pool.into_iter().take(count));
    }

    picked
}

fn pick_cooldowns<R: Rng + ?Sized>(
    catalog: &[Exercise],
    parts: &[BodyPart],
    rng: &mut R,
) -> Vec<Exercise> {
    let pool = exercises_in(catalog, Category::Cooldown);

    let mut picked: Vec<Exercise> = Vec::with_capacity(parts.len() + 1);

    let general: Vec<&Exercise> = pool.iter().filter(|e| e.targets(BodyPart::General)).collect();
    match general.choose(rng) {
        Some(ex) => picked.push(**ex),
        None => {
            if let Some(first) = pool.first() {
                picked.push(*first);
            }
        }
    }

    for part in parts {
        let unused = |e: &&Exercise| !picked.iter().any(|p| p.id == e.id);
        let next = pool
            .iter()
            .filter(unused)
            .find(|e| e.targets(*part))
            .or_else(|| pool.iter().find(unused))
            .copied();

        if let Some(ex) = next {
            picked.push(ex);
        }
    }

    picked
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::exercises::EXERCISE_DB;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::HashSet;

    fn generate(parts: &[BodyPart], minutes: u32, seed: u64) -> WorkoutPlan {
        let mut rng = StdRng::seed_from_u64(seed);
        generate_workout(EXERCISE_DB, parts, minutes, &mut rng, Utc::now()).unwrap()
    }

    fn block(plan: &WorkoutPlan, category: Category) -> Vec<Exercise> {
        plan.exercises.iter().filter(|e| e.category == category).copied().collect()
    }

    fn ex(id: &'static str, category: Category, body_parts: &'static [BodyPart]) -> Exercise {
        Exercise {
            id,
            name: id,
            category,
            body_parts,
            prescription: None,
            emoji: "",
        }
    }

    #[test]
    fn test_main_exercise_count() {
        assert_eq!(main_exercise_count(20), 2);
        assert_eq!(main_exercise_count(24), 2);
        assert_eq!(main_exercise_count(45), 5);
        assert_eq!(main_exercise_count(120), 16);
        assert_eq!(main_exercise_count(10), 0);
    }

    #[test]
    fn test_allocate_gives_remainder_to_first_parts() {
        assert_eq!(allocate(5, 1), vec![5]);
        assert_eq!(allocate(5, 3), vec![2, 2, 1]);
        assert_eq!(allocate(2, 4), vec![1, 1, 0, 0]);
        assert!(allocate(3, 0).is_empty());
    }

    #[test]
    fn test_single_part_legs_45_minutes() {
        let plan = generate(&[BodyPart::Legs], 45, 1);

        assert_eq!(block(&plan, Category::Warmup).len(), 1);
        let mains = block(&plan, Category::Main);
        assert_eq!(mains.len(), 5);
        assert!(mains.iter().all(|e| e.targets(BodyPart::Legs)));

        let cooldowns = block(&plan, Category::Cooldown);
        assert_eq!(cooldowns.len(), 2);
        assert!(cooldowns[0].targets(BodyPart::General));
        assert!(cooldowns[1].targets(BodyPart::Legs));

        assert_eq!(plan.total_duration, 45);
        assert_eq!(plan.selected_parts, vec![BodyPart::Legs]);
    }

    #[test]
    fn test_chest_back_24_minutes() {
        let plan = generate(&[BodyPart::Chest, BodyPart::Back], 24, 7);

        assert_eq!(block(&plan, Category::Warmup).len(), 2);
        let mains = block(&plan, Category::Main);
        assert_eq!(mains.len(), 2);
        assert!(mains[0].targets(BodyPart::Chest));
        assert!(mains[1].targets(BodyPart::Back));
        assert_eq!(block(&plan, Category::Cooldown).len(), 3);
    }

    #[test]
    fn test_blocks_are_ordered_warmup_main_cooldown() {
        let plan = generate(&[BodyPart::Core, BodyPart::Shoulders, BodyPart::Legs], 90, 3);
        let ranks: Vec<u8> = plan
            .exercises
            .iter()
            .map(|e| match e.category {
                Category::Warmup => 0,
                Category::Main => 1,
                Category::Cooldown => 2,
            })
            .collect();
        let mut sorted = ranks.clone();
        sorted.sort();
        assert_eq!(ranks, sorted);
    }

    #[test]
    fn test_main_blocks_follow_selection_order() {
        let parts = [BodyPart::Shoulders, BodyPart::Chest, BodyPart::Core];
        // 50 min -> 6 main -> 2 each
        let plan = generate(&parts, 50, 11);
        let mains = block(&plan, Category::Main);
        assert_eq!(mains.len(), 6);
        for (i, part) in parts.iter().enumerate() {
            assert!(mains[i * 2].targets(*part));
            assert!(mains[i * 2 + 1].targets(*part));
        }
    }

    #[test]
    fn test_remainder_goes_to_first_parts() {
        let parts = [BodyPart::Back, BodyPart::Legs, BodyPart::Core];
        // 45 min -> 5 main -> 2, 2, 1
        let plan = generate(&parts, 45, 5);
        let mains = block(&plan, Category::Main);
        assert_eq!(mains.len(), 5);
        assert!(mains[0].targets(BodyPart::Back) && mains[1].targets(BodyPart::Back));
        assert!(mains[2].targets(BodyPart::Legs) && mains[3].targets(BodyPart::Legs));
        assert!(mains[4].targets(BodyPart::Core));
    }

    #[test]
    fn test_warmups_prefer_relevant_in_catalog_order() {
        let plan = generate(&[BodyPart::Shoulders], 30, 0);
        let warmups = block(&plan, Category::Warmup);
        // w3 is the first warmup tagged shoulders
        assert_eq!(warmups[0].id, "w3");

        let plan = generate(&[BodyPart::Chest, BodyPart::Back], 30, 0);
        let ids: Vec<_> = block(&plan, Category::Warmup).iter().map(|e| e.id).collect();
        // Only w5 and w7 touch back; no warmup tags chest
        assert_eq!(ids, vec!["w5", "w7"]);
    }

    #[test]
    fn test_warmup_wraps_when_pool_too_small() {
        let catalog = [
            ex("wa", Category::Warmup, &[BodyPart::Legs]),
            ex("wb", Category::Warmup, &[BodyPart::Chest]),
            ex("m1", Category::Main, &[BodyPart::Legs]),
            ex("cd", Category::Cooldown, &[BodyPart::General]),
        ];
        let parts = [BodyPart::Chest, BodyPart::Legs, BodyPart::Back];
        let mut rng = StdRng::seed_from_u64(0);
        let plan = generate_workout(&catalog, &parts, 20, &mut rng, Utc::now()).unwrap();

        let ids: Vec<_> = block(&plan, Category::Warmup).iter().map(|e| e.id).collect();
        assert_eq!(ids, vec!["wa", "wb", "wa"]);
    }

    #[test]
    fn test_main_underfills_without_repeats() {
        let catalog = [
            ex("w", Category::Warmup, &[]),
            ex("m1", Category::Main, &[BodyPart::Chest]),
            ex("m2", Category::Main, &[BodyPart::Chest]),
            ex("cd", Category::Cooldown, &[BodyPart::General]),
        ];
        let mut rng = StdRng::seed_from_u64(9);
        let plan = generate_workout(&catalog, &[BodyPart::Chest], 120, &mut rng, Utc::now()).unwrap();

        let mains = block(&plan, Category::Main);
        assert_eq!(mains.len(), 2);
        assert_ne!(mains[0].id, mains[1].id);
    }

    #[test]
    fn test_cooldown_falls_back_without_general_pool() {
        let catalog = [
            ex("w", Category::Warmup, &[]),
            ex("cd_a", Category::Cooldown, &[BodyPart::Back]),
            ex("cd_b", Category::Cooldown, &[BodyPart::Legs]),
        ];
        let mut rng = StdRng::seed_from_u64(2);
        let parts = [BodyPart::Legs, BodyPart::Chest, BodyPart::Core];
        let plan = generate_workout(&catalog, &parts, 20, &mut rng, Utc::now()).unwrap();

        let ids: Vec<_> = block(&plan, Category::Cooldown).iter().map(|e| e.id).collect();
        // First cooldown as general, legs gets cd_b, the rest find nothing unused
        assert_eq!(ids, vec!["cd_a", "cd_b"]);
    }

    #[test]
    fn test_cooldown_uses_any_unused_when_part_has_none() {
        let catalog = [
            ex("w", Category::Warmup, &[]),
            ex("cd_g", Category::Cooldown, &[BodyPart::General]),
            ex("cd_x", Category::Cooldown, &[BodyPart::Back]),
        ];
        let mut rng = StdRng::seed_from_u64(4);
        let plan = generate_workout(&catalog, &[BodyPart::Chest], 20, &mut rng, Utc::now()).unwrap();
        let ids: Vec<_> = block(&plan, Category::Cooldown).iter().map(|e| e.id).collect();
        assert_eq!(ids, vec!["cd_g", "cd_x"]);
    }

    #[test]
    fn test_cooldowns_never_repeat() {
        for seed in 0..20 {
            let plan = generate(BodyPart::selectable(), 120, seed);
            let cooldowns = block(&plan, Category::Cooldown);
            let ids: HashSet<_> = cooldowns.iter().map(|e| e.id).collect();
            assert_eq!(ids.len(), cooldowns.len());
            assert_eq!(cooldowns.len(), 7);
            assert!(cooldowns[0].targets(BodyPart::General));
        }
    }

    #[test]
    fn test_same_seed_same_plan() {
        let parts = [BodyPart::Legs, BodyPart::Core];
        let a = generate(&parts, 60, 42);
        let b = generate(&parts, 60, 42);
        assert_eq!(a.exercises, b.exercises);
    }

    #[test]
    fn test_structure_stable_across_seeds() {
        let parts = [BodyPart::Functional, BodyPart::Back];
        let a = generate(&parts, 75, 1);
        let b = generate(&parts, 75, 2);

        assert_eq!(block(&a, Category::Warmup), block(&b, Category::Warmup));
        for category in [Category::Warmup, Category::Main, Category::Cooldown] {
            assert_eq!(a.count_in(category), b.count_in(category));
        }
    }

    #[test]
    fn test_exercise_count_at_least_parts() {
        for minutes in (MIN_MINUTES..=MAX_MINUTES).step_by(MINUTES_STEP as usize) {
            for n in 1..=BodyPart::selectable().len() {
                let parts = &BodyPart::selectable()[..n];
                let plan = generate(parts, minutes, minutes as u64);
                assert!(plan.len() >= n);
                assert_eq!(plan.count_in(Category::Warmup), n);
                assert_eq!(plan.count_in(Category::Main), main_exercise_count(minutes));
            }
        }
    }

    #[test]
    fn test_duplicate_parts_collapse() {
        let plan = generate(&[BodyPart::Legs, BodyPart::Legs], 30, 0);
        assert_eq!(plan.selected_parts, vec![BodyPart::Legs]);
        assert_eq!(plan.count_in(Category::Warmup), 1);
    }

    #[test]
    fn test_rejects_empty_selection_and_bad_duration() {
        let mut rng = StdRng::seed_from_u64(0);
        assert_eq!(
            generate_workout(EXERCISE_DB, &[], 45, &mut rng, Utc::now()),
            Err(PlanError::NoBodyParts)
        );
        assert_eq!(
            generate_workout(EXERCISE_DB, &[BodyPart::Legs], 15, &mut rng, Utc::now()),
            Err(PlanError::DurationOutOfRange(15))
        );
        assert_eq!(
            generate_workout(EXERCISE_DB, &[BodyPart::Legs], 125, &mut rng, Utc::now()),
            Err(PlanError::DurationOutOfRange(125))
        );
    }

    #[test]
    fn test_plan_id_is_creation_millis() {
        let now = Utc::now();
        let mut rng = StdRng::seed_from_u64(0);
        let plan = generate_workout(EXERCISE_DB, &[BodyPart::Core], 20, &mut rng, now).unwrap();
        assert_eq!(plan.id, now.timestamp_millis().to_string());
        assert_eq!(plan.created_at, now);
    }
}
