//! Bracket evaluation: first- and second-level interaction statistics.
//!
//! Second-level tallies walk two hops over the accumulated history graph: for
//! every one-hop partner, the partner's own partners and opponents are folded
//! in; symmetrically for one-hop opponents. Interaction counts accumulate
//! rather than merely flag, and the player itself and the hop intermediate are
//! excluded from each path.

use crate::models::{Aggregate, Bracket, BracketError, Metric, StatsTable};

const NMETRICS: usize = Metric::ALL.len();

/// Evaluator options.
#[derive(Clone, Copy, Debug, Default)]
pub struct EvalOptions {
    /// Also fold first-level contacts into the second-level tallies.
    ///
    /// Off by default: second-level tallies then count only two-hop paths, so
    /// a direct-only contact does not inflate the indirect-diversity numbers.
    pub include_first_level: bool,
}

/// Evaluate a bracket with default options. See [`evaluate_with`].
pub fn evaluate(bracket: &mut Bracket) -> Result<(), BracketError> {
    evaluate_with(bracket, EvalOptions::default())
}

/// Populate the bracket's statistics table: per-player metrics aggregated
/// across players into min/max/mean/population-stdev, with theoretical-optimal
/// references where a closed form exists.
///
/// Single-shot: evaluating an already-evaluated bracket is an error.
pub fn evaluate_with(bracket: &mut Bracket, options: EvalOptions) -> Result<(), BracketError> {
    if bracket.stats.is_some() {
        return Err(BracketError::AlreadyEvaluated);
    }

    let mut all_stats: Vec<Vec<f64>> = vec![Vec::with_capacity(bracket.nplayers); NMETRICS];
    for player in 0..bracket.nplayers {
        let pl_stats = player_stats(bracket, player, options);
        for (values, value) in all_stats.iter_mut().zip(pl_stats) {
            values.push(value);
        }
    }

    let entries = Metric::ALL
        .iter()
        .zip(&all_stats)
        .map(|(&metric, values)| aggregate(values, optimal_for(metric, bracket.nplayers, bracket.nrounds)))
        .collect();
    bracket.stats = Some(StatsTable::new(entries));
    Ok(())
}

/// All metrics for one player, in `Metric::ALL` order.
fn player_stats(bracket: &Bracket, player: usize, options: EvalOptions) -> [f64; NMETRICS] {
    let hist = bracket.history();
    let nplayers = bracket.nplayers;

    let dist_parts = hist.partners(player).len();

    let opp_row = hist.opp_row(player);
    let dist_opps = opp_row.iter().filter(|&&c| c > 0).count();

    let mut int_row = opp_row.to_vec();
    for &part in hist.partners(player) {
        int_row[part] += 1;
    }
    let dist_ints = int_row.iter().filter(|&&c| c > 0).count();

    // tabulate second-level interactions
    let mut l2_part = vec![0u32; nplayers];
    let mut l2_opp = vec![0u32; nplayers];
    let mut l2_int = vec![0u32; nplayers];
    for other in 0..nplayers {
        if other == player {
            continue;
        }
        let is_partner = hist.were_partners(player, other);
        let faced = hist.opp_count(player, other);
        if options.include_first_level {
            if is_partner {
                l2_part[other] += 1;
                l2_int[other] += 1;
            }
            l2_opp[other] += faced;
            l2_int[other] += faced;
        }
        // partner path (doesn't touch l2_opp)
        if is_partner {
            for l2_other in 0..nplayers {
                if l2_other == player || l2_other == other {
                    continue;
                }
                if hist.were_partners(other, l2_other) {
                    l2_part[l2_other] += 1;
                    l2_int[l2_other] += 1;
                }
                l2_int[l2_other] += hist.opp_count(other, l2_other);
            }
        }
        // opponent path (doesn't touch l2_part)
        if faced > 0 {
            for l2_other in 0..nplayers {
                if l2_other == player || l2_other == other {
                    continue;
                }
                if hist.were_partners(other, l2_other) {
                    l2_int[l2_other] += 1;
                }
                l2_opp[l2_other] += hist.opp_count(other, l2_other);
                l2_int[l2_other] += hist.opp_count(other, l2_other);
            }
        }
    }

    // drop the self slot before tallying the reachable pool
    l2_part.remove(player);
    l2_opp.remove(player);
    l2_int.remove(player);

    let (dist_parts_2, mean_parts_2, spread_parts_2) = pool_stats(&l2_part);
    let (dist_opps_2, mean_opps_2, spread_opps_2) = pool_stats(&l2_opp);
    let (dist_ints_2, mean_ints_2, spread_ints_2) = pool_stats(&l2_int);

    [
        dist_parts as f64,
        dist_opps as f64,
        dist_ints as f64,
        dist_parts_2,
        mean_parts_2,
        spread_parts_2,
        dist_opps_2,
        mean_opps_2,
        spread_opps_2,
        dist_ints_2,
        mean_ints_2,
        spread_ints_2,
    ]
}

/// Distinct count, mean, and spread (max - min) over a reachable pool.
fn pool_stats(pool: &[u32]) -> (f64, f64, f64) {
    let distinct = pool.iter().filter(|&&c| c > 0).count() as f64;
    let mean = pool.iter().sum::<u32>() as f64 / pool.len() as f64;
    let min = pool.iter().min().copied().unwrap_or(0);
    let max = pool.iter().max().copied().unwrap_or(0);
    (distinct, mean, (max - min) as f64)
}

/// Cross-player aggregate: min, max, mean, population stdev.
fn aggregate(values: &[f64], optimal: Option<f64>) -> Aggregate {
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
    Aggregate {
        min: values.iter().copied().fold(f64::INFINITY, f64::min),
        max: values.iter().copied().fold(f64::NEG_INFINITY, f64::max),
        mean,
        stdev: variance.sqrt(),
        optimal,
    }
}

/// Closed-form ideal for a metric, where one exists.
///
/// Derivations assume a bye-free round with no repeats: a player gains one
/// fresh partner and two fresh opponents per round, capped by the pool size;
/// each fresh partner then contributes `nrounds - 1` second-level
/// partnerships and each fresh opponent `2 * nrounds - 1` second-level
/// oppositions, spread over the `nplayers - 1` other players. Spread metrics
/// have no meaningful closed form.
fn optimal_for(metric: Metric, nplayers: usize, nrounds: usize) -> Option<f64> {
    let nr = nrounds as f64;
    let pool = nplayers as f64 - 1.0;
    match metric {
        Metric::DistinctPartners => Some(nr.min(pool)),
        Metric::DistinctOpponents => Some((2.0 * nr).min(pool)),
        Metric::DistinctInteractions => Some((3.0 * nr).min(pool)),
        Metric::DistinctPartners2 => Some((nr * (nr - 1.0)).min(pool)),
        Metric::MeanPartners2 => Some(nr * (nr - 1.0) / pool),
        Metric::DistinctOpponents2 => Some((2.0 * nr * (2.0 * nr - 1.0)).min(pool)),
        Metric::MeanOpponents2 => Some(2.0 * nr * (2.0 * nr - 1.0) / pool),
        Metric::DistinctInteractions2 => Some((3.0 * nr * (3.0 * nr - 1.0)).min(pool)),
        Metric::MeanInteractions2 => Some(3.0 * nr * (3.0 * nr - 1.0) / pool),
        Metric::SpreadPartners2 | Metric::SpreadOpponents2 | Metric::SpreadInteractions2 => None,
    }
}
