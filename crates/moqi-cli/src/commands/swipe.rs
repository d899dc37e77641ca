use anyhow::Context;
use serde::Serialize;

use moqi_core::entities::Startup;
use moqi_core::enums::{Decision, FeedbackPreference, Stage};
use moqi_pipeline::PipelineSession;
use moqi_pipeline::allocation::{AllocationEngine, FlushReport};
use moqi_pipeline::results::Results;
use moqi_pipeline::session::{DecisionReport, PendingWrite};

use crate::cli::GlobalFlags;
use crate::cli::root_commands::SwipeArgs;
use crate::commands::shared::parse::{parse_assignments, parse_value};
use crate::commands::shared::swiper::require_swiper;
use crate::context::AppContext;
use crate::output::output;

#[derive(Debug, Serialize)]
struct SwipeResponse {
    swiper_id: String,
    stage: Stage,
    decisions: Vec<DecisionReport>,
    /// Candidates left undecided when fewer decisions than candidates were given.
    remaining: usize,
    allocation_flush: Option<FlushReport>,
    results: Option<Results>,
    pending_writes: Vec<PendingWrite>,
}

/// Handle `moqi swipe`: one full round driven by the given decisions.
pub async fn handle(args: &SwipeArgs, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let swiper = require_swiper(ctx, &args.swiper).await?;
    let decisions = args
        .decisions
        .iter()
        .map(|raw| parse_value::<Decision>(raw, "decision"))
        .collect::<anyhow::Result<Vec<_>>>()?;
    let feedback: Vec<(String, FeedbackPreference)> =
        parse_assignments(&args.feedback, "feedback")?;
    let allocations: Vec<(String, u32)> = parse_assignments(&args.allocate, "allocation")?;

    let mut session = PipelineSession::new(&ctx.service, swiper.id.clone(), &ctx.config.pipeline);
    session.start().await?;
    preflight(session.swipe().candidates(), &decisions, &feedback, &allocations)?;

    let mut reports = Vec::with_capacity(decisions.len());
    for decision in decisions {
        reports.push(session.decide(decision).await?);
    }

    let mut allocation_flush = None;
    if session.stage() == Stage::Feedback {
        for (startup_id, preference) in &feedback {
            if session.swipe().is_liked(startup_id) {
                session.set_feedback(startup_id, *preference)?;
            }
        }
        session.finish_feedback().await?;
        for (startup_id, coins) in &allocations {
            session.set_allocation(startup_id, *coins)?;
        }
        allocation_flush = Some(session.complete_allocation().await?);
    } else if !allocations.is_empty() {
        tracing::warn!(stage = %session.stage(), "--allocate ignored: fewer than two startups liked");
    }

    if session.stage() == Stage::Results {
        for (startup_id, preference) in &feedback {
            if session.swipe().is_disliked(startup_id) {
                session.set_disliked_feedback(startup_id, *preference).await?;
            } else if allocation_flush.is_none() {
                tracing::warn!(%startup_id, "--feedback for a single liked startup ignored");
            }
        }
    }

    if !session.pending_writes().is_empty()
        && let Err(error) = session.reconcile().await
    {
        tracing::warn!(%error, "could not flush queued writes");
    }

    output(
        &SwipeResponse {
            swiper_id: swiper.id,
            stage: session.stage(),
            decisions: reports,
            remaining: session.swipe().remaining(),
            allocation_flush,
            results: session.results().ok(),
            pending_writes: session.pending_writes().to_vec(),
        },
        flags.format,
    )
}

/// Reject inputs that cannot complete the round before anything is written.
fn preflight(
    candidates: &[Startup],
    decisions: &[Decision],
    feedback: &[(String, FeedbackPreference)],
    allocations: &[(String, u32)],
) -> anyhow::Result<()> {
    if decisions.len() > candidates.len() {
        anyhow::bail!(
            "{} decisions given but only {} candidates are left",
            decisions.len(),
            candidates.len()
        );
    }

    let decided = &candidates[..decisions.len()];
    for (startup_id, _) in feedback {
        if !decided.iter().any(|s| s.id == *startup_id) {
            anyhow::bail!("--feedback names '{startup_id}', which is not decided in this round");
        }
    }

    let liked: Vec<String> = decided
        .iter()
        .zip(decisions)
        .filter(|(_, decision)| decision.is_like())
        .map(|(startup, _)| startup.id.clone())
        .collect();
    if liked.len() >= 2 && decisions.len() == candidates.len() {
        let mut engine = AllocationEngine::new(liked);
        for (startup_id, coins) in allocations {
            engine.set(startup_id, *coins)?;
        }
        engine.ensure_complete().context(
            "pass --allocate STARTUP=COINS for the liked startups, in steps of 10 summing to 100",
        )?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use moqi_core::entities::Startup;
    use moqi_core::enums::{Decision, FeedbackPreference};

    use super::preflight;

    fn startups(ids: &[&str]) -> Vec<Startup> {
        ids.iter()
            .map(|id| Startup {
                id: (*id).to_string(),
                name: id.to_uppercase(),
                tagline: None,
                description: None,
                industry: None,
                founding_year: None,
                employee_band: None,
                logo_url: None,
                created_at: Utc::now(),
            })
            .collect()
    }

    fn coins(entries: &[(&str, u32)]) -> Vec<(String, u32)> {
        entries.iter().map(|(id, c)| ((*id).to_string(), *c)).collect()
    }

    #[test]
    fn accepts_complete_allocation() {
        let candidates = startups(&["a", "b", "c"]);
        let decisions = [Decision::Like, Decision::Like, Decision::Dislike];
        preflight(&candidates, &decisions, &[], &coins(&[("a", 30), ("b", 70)]))
            .expect("complete allocation should pass");
    }

    #[test]
    fn rejects_under_allocation() {
        let candidates = startups(&["a", "b"]);
        let decisions = [Decision::Like, Decision::Like];
        let err = preflight(&candidates, &decisions, &[], &coins(&[("a", 30)]))
            .expect_err("should fail");
        assert!(format!("{err:#}").contains("70 coins left"));
    }

    #[test]
    fn rejects_allocation_to_disliked_startup() {
        let candidates = startups(&["a", "b", "c"]);
        let decisions = [Decision::Like, Decision::Like, Decision::Dislike];
        assert!(
            preflight(&candidates, &decisions, &[], &coins(&[("a", 50), ("c", 50)])).is_err()
        );
    }

    #[test]
    fn rejects_more_decisions_than_candidates() {
        let candidates = startups(&["a"]);
        let decisions = [Decision::Like, Decision::Like];
        assert!(preflight(&candidates, &decisions, &[], &[]).is_err());
    }

    #[test]
    fn single_like_needs_no_allocation() {
        let candidates = startups(&["a", "b"]);
        let decisions = [Decision::Dislike, Decision::Like];
        preflight(&candidates, &decisions, &[], &[]).expect("single like should pass");
    }

    #[test]
    fn partial_round_skips_allocation_check() {
        let candidates = startups(&["a", "b", "c"]);
        let decisions = [Decision::Like, Decision::Like];
        preflight(&candidates, &decisions, &[], &[]).expect("partial round should pass");
    }

    #[test]
    fn rejects_feedback_for_undecided_startup() {
        let candidates = startups(&["a", "b"]);
        let decisions = [Decision::Like];
        let feedback = vec![("b".to_string(), FeedbackPreference::Group)];
        assert!(preflight(&candidates, &decisions, &feedback, &[]).is_err());
    }
}
