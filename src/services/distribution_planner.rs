//! 答案分布规划 - 业务能力层
//!
//! 两种权重含义对应两套独立的算法：
//! - 单选 / 填空：权重是份数，`tiled_sequence` 保证每个完整周期内比例精确
//! - 多选：权重是 1-10 的入选分数，`independent_selections` 每次独立抽取

use crate::models::plan::{PlannedSequence, RunPlan};
use crate::models::question::{Question, QuestionKind};
use indexmap::IndexMap;
use rand::seq::SliceRandom;
use rand::Rng;
use tracing::debug;

/// 多选权重的取值上限，抽取范围为 `[1, MULTI_SELECT_SCALE]`
pub const MULTI_SELECT_SCALE: u32 = 10;

/// 为一组问题生成 `run_count` 次提交的答案计划
///
/// 随机源由调用方传入，固定种子即可复现结果
pub fn plan<'q, R, I>(questions: I, run_count: usize, rng: &mut R) -> RunPlan
where
    R: Rng + ?Sized,
    I: IntoIterator<Item = &'q Question>,
{
    let mut sequences = IndexMap::new();

    for question in questions {
        let sequence = match question.kind {
            QuestionKind::SingleSelect | QuestionKind::FreeText => {
                PlannedSequence::Single(tiled_sequence(&question.options, run_count, rng))
            }
            QuestionKind::MultiSelect => {
                PlannedSequence::Multi(independent_selections(&question.options, run_count, rng))
            }
        };
        debug!(
            "规划问题 {} ({}): {} 条",
            question.identifier,
            question.kind.name(),
            sequence.len()
        );
        sequences.insert(question.identifier.clone(), sequence);
    }

    RunPlan::new(run_count, sequences)
}

/// 按份数平铺：每个选项重复 `w` 次后打乱，首尾相接直到够 `run_count` 条再截断
///
/// 权重总和为 0 或没有选项时返回空序列（该问题不作答）
pub fn tiled_sequence<R>(options: &IndexMap<String, u32>, run_count: usize, rng: &mut R) -> Vec<String>
where
    R: Rng + ?Sized,
{
    let mut tile: Vec<&String> = Vec::new();
    for (label, &weight) in options {
        for _ in 0..weight {
            tile.push(label);
        }
    }

    if tile.is_empty() || run_count == 0 {
        return Vec::new();
    }

    tile.shuffle(rng);

    tile.iter()
        .cycle()
        .take(run_count)
        .map(|label| (*label).clone())
        .collect()
}

/// 多选独立抽取：每次提交、每个选项各抽一个 `[1, 10]` 的数，不大于权重即入选
///
/// 某次一个都没选中时，从全部选项中随机补一个，保证不交白卷
pub fn independent_selections<R>(
    options: &IndexMap<String, u32>,
    run_count: usize,
    rng: &mut R,
) -> Vec<Vec<String>>
where
    R: Rng + ?Sized,
{
    if options.is_empty() {
        return vec![Vec::new(); run_count];
    }

    let labels: Vec<&String> = options.keys().collect();
    let mut selections = Vec::with_capacity(run_count);

    for _ in 0..run_count {
        let mut selected: Vec<String> = options
            .iter()
            .filter(|(_, weight)| rng.gen_range(1..=MULTI_SELECT_SCALE) <= **weight)
            .map(|(label, _)| label.clone())
            .collect();

        if selected.is_empty() {
            if let Some(label) = labels.choose(rng) {
                selected.push((*label).clone());
            }
        }

        selections.push(selected);
    }

    selections
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn options(pairs: &[(&str, u32)]) -> IndexMap<String, u32> {
        pairs.iter().map(|(k, v)| (k.to_string(), *v)).collect()
    }

    fn count(seq: &[String], label: &str) -> usize {
        seq.iter().filter(|s| s.as_str() == label).count()
    }

    #[test]
    fn test_tiled_ratio_is_exact_for_multiples_of_total() {
        let mut rng = StdRng::seed_from_u64(7);
        let opts = options(&[("A", 3), ("B", 1), ("C", 2)]);

        for multiple in 1..=5 {
            let run_count = 6 * multiple;
            let seq = tiled_sequence(&opts, run_count, &mut rng);
            assert_eq!(seq.len(), run_count);
            assert_eq!(count(&seq, "A"), 3 * multiple);
            assert_eq!(count(&seq, "B"), multiple);
            assert_eq!(count(&seq, "C"), 2 * multiple);
        }
    }

    #[test]
    fn test_tiled_each_tile_repeats_same_order() {
        let mut rng = StdRng::seed_from_u64(11);
        let seq = tiled_sequence(&options(&[("A", 2), ("B", 3)]), 12, &mut rng);
        assert_eq!(seq[0..5], seq[5..10]);
        assert_eq!(seq[10..12], seq[0..2]);
    }

    #[test]
    fn test_tiled_two_options_four_runs() {
        let mut rng = StdRng::seed_from_u64(42);
        let seq = tiled_sequence(&options(&[("A", 1), ("B", 1)]), 4, &mut rng);
        assert_eq!(seq.len(), 4);
        assert_eq!(count(&seq, "A"), 2);
        assert_eq!(count(&seq, "B"), 2);
    }

    #[test]
    fn test_tiled_zero_weight_or_no_options_is_empty() {
        let mut rng = StdRng::seed_from_u64(1);
        assert!(tiled_sequence(&options(&[("A", 0), ("B", 0)]), 10, &mut rng).is_empty());
        assert!(tiled_sequence(&IndexMap::new(), 10, &mut rng).is_empty());
    }

    #[test]
    fn test_tiled_zero_weight_option_never_appears() {
        let mut rng = StdRng::seed_from_u64(3);
        let seq = tiled_sequence(&options(&[("A", 0), ("B", 2)]), 7, &mut rng);
        assert_eq!(count(&seq, "A"), 0);
        assert_eq!(count(&seq, "B"), 7);
    }

    #[test]
    fn test_multi_full_weight_selects_everything() {
        let mut rng = StdRng::seed_from_u64(5);
        let opts = options(&[("X", 10), ("Y", 10), ("Z", 10)]);
        let selections = independent_selections(&opts, 50, &mut rng);
        assert_eq!(selections.len(), 50);
        for selection in selections {
            assert_eq!(selection, vec!["X", "Y", "Z"]);
        }
    }

    #[test]
    fn test_multi_zero_weight_still_selects_one() {
        let mut rng = StdRng::seed_from_u64(9);
        let opts = options(&[("X", 0), ("Y", 0), ("Z", 0)]);
        for selection in independent_selections(&opts, 50, &mut rng) {
            assert_eq!(selection.len(), 1);
            assert!(opts.contains_key(&selection[0]));
        }
    }

    #[test]
    fn test_multi_without_options_is_empty_per_run() {
        let mut rng = StdRng::seed_from_u64(9);
        let selections = independent_selections(&IndexMap::new(), 3, &mut rng);
        assert_eq!(selections, vec![Vec::<String>::new(); 3]);
    }

    #[test]
    fn test_plan_dispatches_by_kind() {
        let questions = vec![
            Question::new("entry.1", "单选", QuestionKind::SingleSelect)
                .with_option("A", 1)
                .with_option("B", 1),
            Question::new("entry.2", "多选", QuestionKind::MultiSelect)
                .with_option("X", 10),
            Question::new("entry.3", "填空", QuestionKind::FreeText),
        ];
        let mut rng = StdRng::seed_from_u64(2024);
        let run_plan = plan(&questions, 4, &mut rng);

        assert_eq!(run_plan.run_count(), 4);
        match run_plan.sequence("entry.1") {
            Some(PlannedSequence::Single(values)) => {
                assert_eq!(values.len(), 4);
                assert_eq!(count(values, "A"), 2);
                assert_eq!(count(values, "B"), 2);
            }
            other => panic!("unexpected sequence: {:?}", other),
        }
        match run_plan.sequence("entry.2") {
            Some(PlannedSequence::Multi(selections)) => assert_eq!(selections.len(), 4),
            other => panic!("unexpected sequence: {:?}", other),
        }
        assert!(run_plan.sequence("entry.3").unwrap().is_empty());
    }

    #[test]
    fn test_plan_is_reproducible_with_same_seed() {
        let questions = vec![
            Question::new("entry.1", "单选", QuestionKind::SingleSelect)
                .with_option("A", 3)
                .with_option("B", 5)
                .with_option("C", 2),
            Question::new("entry.2", "多选", QuestionKind::MultiSelect)
                .with_option("X", 4)
                .with_option("Y", 7),
        ];
        let first = plan(&questions, 20, &mut StdRng::seed_from_u64(99));
        let second = plan(&questions, 20, &mut StdRng::seed_from_u64(99));
        assert_eq!(first, second);
    }
}
