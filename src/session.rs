//! Per-user analysis state.
//!
//! An [`AnalysisSession`] owns the result cache, the graph engine of the open
//! visualization and a generation counter. Closing the view bumps the
//! generation, so results of fetches started before the close are dropped
//! instead of cached.

use crate::analysis;
use crate::config::Config;
use crate::graph::{GraphEngine, GraphSettings};
use crate::model::{AnalysisResult, RepoId};
use crate::source::{FetchError, RepoFiles, RepositorySource, fetch_snapshot};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

struct CacheEntry {
    result: Arc<AnalysisResult>,
    fetched_at: Instant,
}

/// Proof that a fetch was started in a given generation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ticket {
    repo: RepoId,
    generation: u64,
}

impl Ticket {
    pub fn repo(&self) -> &RepoId {
        &self.repo
    }
}

pub struct AnalysisSession {
    ttl: Duration,
    graph_settings: GraphSettings,
    cache: HashMap<String, CacheEntry>,
    generation: u64,
    engine: Option<(RepoId, GraphEngine)>,
}

impl Default for AnalysisSession {
    fn default() -> Self {
        Self::new(&Config::default())
    }
}

impl AnalysisSession {
    pub fn new(config: &Config) -> Self {
        Self {
            ttl: config.cache.ttl,
            graph_settings: config.graph,
            cache: HashMap::new(),
            generation: 0,
            engine: None,
        }
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Fresh cached result for `repo` as of `now`. Stale entries are evicted.
    pub fn cached_at(&mut self, repo: &RepoId, now: Instant) -> Option<Arc<AnalysisResult>> {
        let key = repo.key();
        let entry = self.cache.get(&key)?;
        if now.saturating_duration_since(entry.fetched_at) < self.ttl {
            return Some(Arc::clone(&entry.result));
        }
        tracing::debug!(repo = %key, "cache entry expired");
        self.cache.remove(&key);
        None
    }

    pub fn cached(&mut self, repo: &RepoId) -> Option<Arc<AnalysisResult>> {
        self.cached_at(repo, Instant::now())
    }

    /// Mark the start of a fetch for `repo`.
    pub fn begin(&self, repo: &RepoId) -> Ticket {
        Ticket {
            repo: repo.clone(),
            generation: self.generation,
        }
    }

    /// Cache a finished analysis, unless the view was closed after the
    /// ticket was issued.
    pub fn finish_at(
        &mut self,
        ticket: Ticket,
        result: AnalysisResult,
        now: Instant,
    ) -> Option<Arc<AnalysisResult>> {
        if ticket.generation != self.generation {
            tracing::debug!(
                repo = %ticket.repo,
                started = ticket.generation,
                current = self.generation,
                "discarding stale analysis"
            );
            return None;
        }
        let result = Arc::new(result);
        self.cache.insert(
            ticket.repo.key(),
            CacheEntry {
                result: Arc::clone(&result),
                fetched_at: now,
            },
        );
        Some(result)
    }

    pub fn finish(&mut self, ticket: Ticket, result: AnalysisResult) -> Option<Arc<AnalysisResult>> {
        self.finish_at(ticket, result, Instant::now())
    }

    /// Cached result, or a fresh fetch and analysis through `source`.
    pub async fn analyze(
        &mut self,
        source: &dyn RepositorySource,
        repo: &RepoId,
    ) -> Result<Arc<AnalysisResult>, FetchError> {
        if let Some(hit) = self.cached(repo) {
            tracing::debug!(repo = %repo, "cache hit");
            return Ok(hit);
        }

        let snapshot = fetch_snapshot(source, repo).await?;
        let result = analysis::analyze(repo, snapshot, &RepoFiles::new(source, repo)).await;

        let result = Arc::new(result);
        self.cache.insert(
            repo.key(),
            CacheEntry {
                result: Arc::clone(&result),
                fetched_at: Instant::now(),
            },
        );
        Ok(result)
    }

    /// Drop the cached result for `repo`.
    pub fn invalidate(&mut self, repo: &RepoId) -> bool {
        self.cache.remove(&repo.key()).is_some()
    }

    pub fn clear(&mut self) {
        self.cache.clear();
    }

    /// Graph engine for `repo`, created and started on first use from the
    /// cached analysis. Opening another repository's graph stops the old one.
    pub fn graph_engine(&mut self, repo: &RepoId) -> Option<&mut GraphEngine> {
        let current = matches!(&self.engine, Some((id, _)) if id == repo);
        if !current {
            let result = self.cached(repo)?;
            if let Some((_, mut old)) = self.engine.take() {
                old.stop();
            }
            let mut engine = GraphEngine::new(
                repo.clone(),
                result.branch.clone(),
                result.files.clone(),
                self.graph_settings,
            );
            engine.start();
            self.engine = Some((repo.clone(), engine));
        }
        self.engine.as_mut().map(|(_, engine)| engine)
    }

    /// Tear down the visualization and orphan any fetch in flight.
    pub fn close_view(&mut self) {
        if let Some((_, mut engine)) = self.engine.take() {
            engine.stop();
        }
        self.generation += 1;
        tracing::debug!(generation = self.generation, "view closed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::EngineState;
    use crate::model::{RepoInfo, TreeItem};
    use crate::source::testing::StubSource;

    fn stub() -> StubSource {
        StubSource {
            info: RepoInfo {
                name: "demo".into(),
                default_branch: Some("main".into()),
                ..Default::default()
            },
            trees: HashMap::from([(
                "main".to_string(),
                vec![
                    TreeItem::tree("src"),
                    TreeItem::blob("src/index.js", 1200),
                    TreeItem::blob("package.json", 80),
                ],
            )]),
            commits: Some(Vec::new()),
            files: HashMap::from([(
                "package.json".to_string(),
                r#"{"dependencies":{"react":"^18.0.0"}}"#.to_string(),
            )]),
            ..Default::default()
        }
    }

    fn repo() -> RepoId {
        RepoId::new("octo", "demo")
    }

    #[tokio::test]
    async fn test_second_analyze_hits_cache() {
        let source = stub();
        let mut session = AnalysisSession::default();
        let first = session.analyze(&source, &repo()).await.unwrap();
        let second = session.analyze(&source, &repo()).await.unwrap();

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(source.requested.lock().unwrap().len(), 1);
        assert_eq!(first.dependencies.npm.len(), 1);

        assert!(session.invalidate(&repo()));
        session.analyze(&source, &repo()).await.unwrap();
        assert_eq!(source.requested.lock().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_entries_expire_after_ttl() {
        let source = stub();
        let mut session = AnalysisSession::default();
        session.analyze(&source, &repo()).await.unwrap();

        let now = Instant::now();
        assert!(session.cached_at(&repo(), now).is_some());
        let later = now + Duration::from_secs(31 * 60);
        assert!(session.cached_at(&repo(), later).is_none());
        // evicted, not just hidden
        assert!(session.cached_at(&repo(), now).is_none());
    }

    #[tokio::test]
    async fn test_results_after_close_are_discarded() {
        let source = stub();
        let mut session = AnalysisSession::default();
        let snapshot = fetch_snapshot(&source, &repo()).await.unwrap();
        let result = analysis::analyze(&repo(), snapshot, &RepoFiles::new(&source, &repo())).await;

        let ticket = session.begin(&repo());
        session.close_view();
        assert!(session.finish(ticket, result.clone()).is_none());
        assert!(session.cached(&repo()).is_none());

        let ticket = session.begin(&repo());
        assert!(session.finish(ticket, result).is_some());
        assert!(session.cached(&repo()).is_some());
    }

    #[tokio::test]
    async fn test_graph_engine_is_lazy_and_torn_down() {
        let source = stub();
        let mut session = AnalysisSession::default();
        assert!(session.graph_engine(&repo()).is_none());

        session.analyze(&source, &repo()).await.unwrap();
        let engine = session.graph_engine(&repo()).unwrap();
        assert_eq!(engine.state(), EngineState::Simulating);
        engine.run(3);
        assert_eq!(session.graph_engine(&repo()).unwrap().steps(), 3);

        session.close_view();
        assert_eq!(session.generation(), 1);
        // a fresh engine is built on the next open
        assert_eq!(session.graph_engine(&repo()).unwrap().steps(), 0);
    }
}
