pub mod session;

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::task::JoinHandle;
use tokio_util::sync::{CancellationToken, DropGuard};
use tracing::{debug, warn};

use crate::catalog::schema::{Category, KnowledgeEntry};
use crate::catalog::NewProgram;

pub use session::LookupSession;

#[async_trait]
pub trait ProgramLookup: Send + Sync {
    async fn lookup(&self, name: &str) -> Option<f64>;
}

/// First entry whose fragment contains the query or is contained by it.
/// Ties go to table order.
pub fn match_knowledge_base(entries: &[KnowledgeEntry], name: &str) -> Option<f64> {
    let normalized = name.trim().to_lowercase();
    if normalized.is_empty() {
        return None;
    }
    entries
        .iter()
        .find(|entry| {
            normalized.contains(entry.fragment.as_str())
                || entry.fragment.contains(normalized.as_str())
        })
        .map(|entry| entry.value)
}

#[derive(Debug, Clone)]
pub struct KnowledgeBaseLookup {
    entries: Vec<KnowledgeEntry>,
    delay: Duration,
}

impl KnowledgeBaseLookup {
    pub fn new(entries: Vec<KnowledgeEntry>, delay: Duration) -> Self {
        Self { entries, delay }
    }

    pub fn entries(&self) -> &[KnowledgeEntry] {
        &self.entries
    }
}

#[async_trait]
impl ProgramLookup for KnowledgeBaseLookup {
    async fn lookup(&self, name: &str) -> Option<f64> {
        if name.trim().is_empty() {
            return None;
        }
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        match_knowledge_base(&self.entries, name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "state", content = "value", rename_all = "snake_case")]
pub enum LookupState {
    Idle,
    Pending,
    Found(f64),
    NotFound,
    Cancelled,
}

impl LookupState {
    pub fn is_settled(&self) -> bool {
        matches!(self, Self::Found(_) | Self::NotFound)
    }

    pub fn value(&self) -> Option<f64> {
        match self {
            Self::Found(value) => Some(*value),
            _ => None,
        }
    }
}

impl From<Option<f64>> for LookupState {
    fn from(value: Option<f64>) -> Self {
        value.map_or(Self::NotFound, Self::Found)
    }
}

pub fn program_from_lookup(
    name: &str,
    category: Category,
    state: LookupState,
    manual_value: Option<f64>,
) -> Option<NewProgram> {
    let value = state.value().or(manual_value)?;
    Some(NewProgram {
        name: name.trim().to_string(),
        category,
        value,
        reference_ppm: None,
    })
}

pub struct LookupTask {
    query: String,
    token: CancellationToken,
    handle: JoinHandle<LookupState>,
    _guard: DropGuard,
}

impl LookupTask {
    pub fn spawn(lookup: Arc<dyn ProgramLookup>, query: impl Into<String>) -> Self {
        let query = query.into();
        let token = CancellationToken::new();
        let task_token = token.clone();
        let task_query = query.clone();
        debug!("lookup started for {task_query:?}");
        let handle = tokio::spawn(async move {
            tokio::select! {
                biased;
                () = task_token.cancelled() => LookupState::Cancelled,
                result = lookup.lookup(&task_query) => {
                    if task_token.is_cancelled() {
                        LookupState::Cancelled
                    } else {
                        LookupState::from(result)
                    }
                }
            }
        });
        Self {
            query,
            _guard: token.clone().drop_guard(),
            token,
            handle,
        }
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn cancel(&self) {
        debug!("lookup cancelled for {:?}", self.query);
        self.token.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    /// Waits for the result. A cancelled task never reports a value, even
    /// if the lookup itself had already completed.
    pub async fn outcome(mut self) -> LookupState {
        let joined = (&mut self.handle).await;
        if self.token.is_cancelled() {
            return LookupState::Cancelled;
        }
        match joined {
            Ok(state) => state,
            Err(err) => {
                warn!("lookup task for {:?} failed: {err}", self.query);
                LookupState::Cancelled
            }
        }
    }
}


#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use crate::catalog::defaults::default_knowledge_base;
    use crate::catalog::schema::{Category, KnowledgeEntry};
    use crate::lookup::test_support::GatedLookup;
    use crate::lookup::{
        match_knowledge_base, program_from_lookup, KnowledgeBaseLookup, LookupState, LookupTask,
        ProgramLookup,
    };

    #[test]
    fn matches_substrings_in_either_direction() {
        let kb = default_knowledge_base();
        assert_eq!(match_knowledge_base(&kb, "British Airways Avios"), Some(1.5));
        assert_eq!(match_knowledge_base(&kb, "  SINGAPORE airlines KrisFlyer"), Some(1.7));
        assert_eq!(match_knowledge_base(&kb, "flying"), Some(1.2));
        assert_eq!(match_knowledge_base(&kb, "Qantas Frequent Flyer"), None);
        assert_eq!(match_knowledge_base(&kb, "   "), None);
    }

    #[test]
    fn first_hit_in_table_order_wins() {
        let kb = vec![
            KnowledgeEntry::new("air", 1.0),
            KnowledgeEntry::new("air france", 1.2),
        ];
        assert_eq!(match_knowledge_base(&kb, "Air France"), Some(1.0));

        let reversed: Vec<KnowledgeEntry> = kb.into_iter().rev().collect();
        assert_eq!(match_knowledge_base(&reversed, "Air France"), Some(1.2));
    }

    #[test]
    fn knowledge_base_lookup_without_delay() {
        let lookup = KnowledgeBaseLookup::new(default_knowledge_base(), Duration::ZERO);
        assert_eq!(tokio_test::block_on(lookup.lookup("Accor Live Limitless")), Some(2.2));
        assert_eq!(tokio_test::block_on(lookup.lookup("")), None);
    }

    #[tokio::test]
    async fn task_reports_found_and_not_found() {
        let lookup = Arc::new(KnowledgeBaseLookup::new(
            default_knowledge_base(),
            Duration::from_millis(5),
        ));
        let found = LookupTask::spawn(lookup.clone(), "Emirates Skywards");
        assert_eq!(found.outcome().await, LookupState::Found(1.2));

        let missing = LookupTask::spawn(lookup, "Turkish Miles&Smiles");
        assert_eq!(missing.outcome().await, LookupState::NotFound);
    }

    #[tokio::test]
    async fn cancelled_task_drops_its_result() {
        let (lookup, gate) = GatedLookup::new(Some(1.4));
        let task = LookupTask::spawn(lookup, "Virgin Atlantic");
        assert!(!task.is_finished());
        task.cancel();
        gate.notify_one();
        assert_eq!(task.outcome().await, LookupState::Cancelled);
    }

    #[tokio::test]
    async fn result_arriving_before_cancel_is_still_dropped() {
        let (lookup, gate) = GatedLookup::new(Some(1.4));
        let task = LookupTask::spawn(lookup, "Virgin Atlantic");
        gate.notify_one();
        while !task.is_finished() {
            tokio::task::yield_now().await;
        }
        task.cancel();
        assert_eq!(task.outcome().await, LookupState::Cancelled);
    }

    #[test]
    fn state_helpers() {
        assert_eq!(LookupState::from(Some(1.3)).value(), Some(1.3));
        assert_eq!(LookupState::from(None), LookupState::NotFound);
        assert!(LookupState::NotFound.is_settled());
        assert!(!LookupState::Pending.is_settled());
        assert!(!LookupState::Cancelled.is_settled());
    }

    #[test]
    fn found_value_beats_manual_value() {
        let program = program_from_lookup(
            " Avianca LifeMiles ",
            Category::Airline,
            LookupState::Found(1.4),
            Some(0.9),
        )
        .unwrap();
        assert_eq!(program.name, "Avianca LifeMiles");
        assert_eq!(program.value, 1.4);

        let manual = program_from_lookup(
            "Avianca",
            Category::Airline,
            LookupState::NotFound,
            Some(0.9),
        )
        .unwrap();
        assert_eq!(manual.value, 0.9);
        assert!(
            program_from_lookup("Avianca", Category::Hotel, LookupState::NotFound, None).is_none()
        );
        assert!(
            program_from_lookup("Avianca", Category::Hotel, LookupState::Cancelled, None).is_none()
        );
    }
}
