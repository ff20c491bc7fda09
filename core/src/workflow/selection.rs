// ruleflow/src/workflow/selection.rs

//! Next-node selection.

use crate::core::context_data::ContextData;
use crate::core::control::BranchOutcome;
use crate::engine::Engine;
use crate::workflow::graph::Graph;

use tracing::{event, Level};

impl Engine {
  /// Picks the node to visit after `current_id`.
  ///
  /// 1. Keep the outgoing edges whose tag is absent or equal to `outcome`, in declaration order.
  /// 2. Return the target of the first kept edge with no guard or a guard that holds.
  /// 3. Otherwise fall back to the first kept edge's target, even though its guard failed.
  pub async fn select_next(
    &self,
    graph: &Graph<'_>,
    ctx: &ContextData,
    current_id: &str,
    outcome: Option<BranchOutcome>,
  ) -> Option<String> {
    let tag = outcome.map(|o| o.as_tag());
    let candidates: Vec<_> = graph
      .outgoing_edges(current_id)
      .into_iter()
      .filter(|edge| edge.condition.is_none() || edge.condition.as_deref() == tag)
      .collect();

    for edge in &candidates {
      let eligible = match &edge.conditions {
        None => true,
        Some(guard) => self.evaluator.check_conditions(guard, ctx).await,
      };
      if eligible {
        event!(Level::DEBUG, from = current_id, to = %edge.target, "Edge selected.");
        return Some(edge.target.clone());
      }
    }

    // TODO: confirm whether a failed guard should really be routed through; see DESIGN.md.
    let fallback = candidates.first().map(|edge| edge.target.clone());
    if let Some(target) = &fallback {
      event!(Level::DEBUG, from = current_id, to = %target, "No guard held, falling back to the first candidate edge.");
    }
    fallback
  }
}
