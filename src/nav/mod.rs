// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Dashnav-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Dashnav and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! The navigation orchestrator.
//!
//! [`Navigator`] owns one navigation state per running application: the tree, the current
//! context and breadcrumbs, list disclosure, cached subtrees, fetch errors, the signed-in
//! identity and the theme preference. Views read it through [`Navigator::view`] and drive it
//! through the action methods; the host router reports every path change to
//! [`Navigator::observe_route`].
//!
//! State lives behind one async mutex that is never held across an await. Every continuation
//! after a fetch re-locks and re-reads the tree before touching it.

mod error;
mod view;


use std::collections::{BTreeMap, BTreeSet, HashSet, VecDeque};
use std::sync::Arc;

use tokio::sync::{Mutex, MutexGuard};
use tracing::{debug, warn};

use crate::breadcrumbs::{self, Breadcrumbs};
use crate::cache::SubtreeCache;
use crate::config::NavigatorConfig;
use crate::gateway::{CredentialRefresher, DataGateway, GatewayError, Identity, NoRefresh, RouteHost};
use crate::model::{
    EntityKind, EntityList, Level, NavigationContext, NodeId, NodeRef, ProjectSummary,
};
use crate::routes;
use crate::store::{PersistedNavigation, PersistenceAdapter};
use crate::tree::{build_child_nodes, build_company_node, node_ids, TreeStore};

pub use error::NavigationError;
pub use view::NavigationView;

/// Levels whose lists are loaded on the way to the active node. Sessions are leaves.
const PATH_LEVELS: [Level; 3] = [Level::Project, Level::Cohort, Level::User];

/// Everything the navigator talks to.
#[derive(Clone)]
pub struct NavigatorServices {
    pub gateway: Arc<dyn DataGateway>,
    pub refresher: Arc<dyn CredentialRefresher>,
    pub routes: Arc<dyn RouteHost>,
    pub storage: Arc<dyn PersistenceAdapter>,
    /// Session-scoped storage mirroring fetched lists.
    pub cache_mirror: Option<Arc<dyn PersistenceAdapter>>,
}

impl NavigatorServices {
    pub fn new(
        gateway: Arc<dyn DataGateway>,
        routes: Arc<dyn RouteHost>,
        storage: Arc<dyn PersistenceAdapter>,
    ) -> Self {
        Self {
            gateway,
            refresher: Arc::new(NoRefresh),
            routes,
            storage,
            cache_mirror: None,
        }
    }

    pub fn with_refresher(mut self, refresher: Arc<dyn CredentialRefresher>) -> Self {
        self.refresher = refresher;
        self
    }

    pub fn with_cache_mirror(mut self, mirror: Arc<dyn PersistenceAdapter>) -> Self {
        self.cache_mirror = Some(mirror);
        self
    }
}

struct NavState {
    tree: TreeStore,
    context: NavigationContext,
    /// Context of the last reconciled observation. `None` until the first observation of this
    /// runtime, so a restored context never suppresses reconciliation.
    last_reconciled: Option<NavigationContext>,
    breadcrumbs: Breadcrumbs,
    list_expanded: BTreeSet<NodeId>,
    cache: SubtreeCache,
    in_flight: HashSet<NodeId>,
    errors: BTreeMap<NodeId, String>,
    identity: Option<Identity>,
    is_dark_mode: bool,
    is_loading: bool,
    /// Bumped on sign-out; responses started under an older epoch are dropped.
    epoch: u64,
}

impl NavState {
    fn restore(storage: &dyn PersistenceAdapter, key: &str, cache: SubtreeCache) -> Self {
        let snapshot = match PersistedNavigation::load(storage, key) {
            Ok(snapshot) => snapshot.unwrap_or_default(),
            Err(err) => {
                warn!(key, error = %err, "ignoring unreadable navigation snapshot");
                PersistedNavigation::default()
            }
        };
        let context = snapshot.context();
        Self {
            tree: TreeStore::with_expanded(snapshot.expanded_nodes.iter().cloned()),
            breadcrumbs: breadcrumbs::generate(&context),
            context,
            last_reconciled: None,
            list_expanded: BTreeSet::new(),
            cache,
            in_flight: HashSet::new(),
            errors: BTreeMap::new(),
            identity: None,
            is_dark_mode: snapshot.is_dark_mode,
            is_loading: false,
            epoch: 0,
        }
    }

    fn snapshot(&self) -> PersistedNavigation {
        let expanded = if self.tree.is_empty() {
            self.tree.expanded().iter().cloned().collect()
        } else {
            self.tree.live_expanded()
        };
        PersistedNavigation::new(&self.context, expanded, self.is_dark_mode)
    }

    /// Expands the path to the current context, marks its node active and discloses the lists
    /// on the way.
    fn reveal_current(&mut self) {
        let context = self.context.resolved();
        self.tree.expand_path(&context.expansion_path());
        self.tree.set_active(&context.active_node_id());

        if context.project_id.is_some() {
            self.list_expanded.insert(NodeId::company());
        }
        if context.cohort_id.is_some() {
            if let Some(project) = context.node_id_at(Level::Project) {
                self.list_expanded.insert(project);
            }
        }
    }

    /// Attaches cached child lists to every childless node, top-down.
    fn reattach_cached(&mut self) {
        let mut queue: VecDeque<NodeRef> = self.tree.tree().iter().cloned().collect();
        while let Some(node) = queue.pop_front() {
            let Some(kind) = EntityKind::children_of(node.kind()) else {
                continue;
            };
            if !node.has_children() {
                let Some(list) = self.cache.get(node.id(), kind).cloned() else {
                    continue;
                };
                match build_child_nodes(&node, &list) {
                    Ok(children) => {
                        self.tree.attach_children(node.id(), children);
                    }
                    Err(err) => {
                        warn!(node = %node.id(), error = %err, "cached list does not fit its node");
                        continue;
                    }
                }
            }
            if let Some(node) = self.tree.find(node.id()) {
                queue.extend(node.children().iter().cloned());
            }
        }
    }

    fn record_error(&mut self, node_id: &NodeId, err: &NavigationError) {
        warn!(node = %node_id, error = %err, "navigation load failed");
        self.errors.insert(node_id.clone(), err.to_string());
    }
}

struct PendingLoad {
    kind: EntityKind,
    identity: Identity,
    epoch: u64,
}

#[derive(Clone)]
pub struct Navigator {
    state: Arc<Mutex<NavState>>,
    gateway: Arc<dyn DataGateway>,
    refresher: Arc<dyn CredentialRefresher>,
    routes: Arc<dyn RouteHost>,
    storage: Arc<dyn PersistenceAdapter>,
    config: Arc<NavigatorConfig>,
}

impl Navigator {
    /// Builds a navigator and restores the persisted snapshot (context, expansions, theme).
    ///
    /// The restored context is shown until the first route observation, which always
    /// reconciles.
    pub fn new(config: NavigatorConfig, services: NavigatorServices) -> Self {
        let cache = match services.cache_mirror {
            Some(mirror) => SubtreeCache::with_mirror(mirror),
            None => SubtreeCache::new(),
        };
        let state = NavState::restore(services.storage.as_ref(), &config.storage_key, cache);
        Self {
            state: Arc::new(Mutex::new(state)),
            gateway: services.gateway,
            refresher: services.refresher,
            routes: services.routes,
            storage: services.storage,
            config: Arc::new(config),
        }
    }

    pub fn config(&self) -> &NavigatorConfig {
        &self.config
    }

    async fn lock(&self) -> MutexGuard<'_, NavState> {
        self.state.lock().await
    }

    fn persist(&self, state: &NavState) {
        if let Err(err) = state.snapshot().save(self.storage.as_ref(), &self.config.storage_key) {
            warn!(key = %self.config.storage_key, error = %err, "failed to persist navigation state");
        }
    }

    pub async fn view(&self) -> NavigationView {
        let state = self.lock().await;
        NavigationView {
            tree: state.tree.tree().to_vec(),
            breadcrumbs: state.breadcrumbs.clone(),
            current_context: state.context.clone(),
            current_level: state.context.level(),
            active_node_id: state.tree.active_node_id().cloned(),
            is_loading: state.is_loading,
            expanded: state.tree.expanded().iter().cloned().collect(),
            list_expanded: state.list_expanded.iter().cloned().collect(),
            errors: state.errors.clone(),
            is_dark_mode: state.is_dark_mode,
            user_email: state.identity.as_ref().map(|identity| identity.email.clone()),
        }
    }

    pub async fn is_loading(&self) -> bool {
        self.lock().await.is_loading
    }

    pub async fn current_context(&self) -> NavigationContext {
        self.lock().await.context.clone()
    }

    pub async fn tree(&self) -> Vec<NodeRef> {
        self.lock().await.tree.tree().to_vec()
    }

    pub async fn find_node(&self, node_id: &NodeId) -> Option<NodeRef> {
        self.lock().await.tree.find(node_id).cloned()
    }

    /// Node of the current context, with its metadata; `None` until it has been loaded.
    pub async fn current_node(&self) -> Option<NodeRef> {
        let state = self.lock().await;
        state.tree.find(&state.context.active_node_id()).cloned()
    }

    /// Ids from the company root down to the active node.
    pub async fn active_path(&self) -> Vec<NodeId> {
        self.lock().await.tree.active_path()
    }

    /// Reconciles navigation state with `path`.
    ///
    /// Returns `Ok(false)` when the parsed context equals the last reconciled one. Otherwise
    /// breadcrumbs are regenerated, the path to the new active node is expanded (nothing is
    /// collapsed), the node is marked active, and any list on that path that was never loaded
    /// is fetched, top-down. Loading stops at the first failure; the failure is also recorded
    /// in the view against the node whose list failed.
    pub async fn observe_route(&self, path: &str) -> Result<bool, NavigationError> {
        let context = routes::parse_route(path);
        {
            let mut state = self.lock().await;
            if state.last_reconciled.as_ref() == Some(&context) {
                debug!(path, "route unchanged");
                return Ok(false);
            }
            debug!(path, level = %context.level(), "reconciling route");
            state.last_reconciled = Some(context.clone());
            state.context = context.clone();
            state.breadcrumbs = breadcrumbs::generate(&context);
            state.reveal_current();
            self.persist(&state);
        }

        self.ensure_company().await?;
        self.load_current_path().await?;
        Ok(true)
    }

    /// Loads the lists on the path to the current context, top-down.
    ///
    /// The context is re-read before every step. When it changed during a load, the walk
    /// restarts from the project level for the new context, so a route observed while another
    /// observation was loading still gets its lists from whichever walk is running.
    async fn load_current_path(&self) -> Result<(), NavigationError> {
        let mut walked: Option<NavigationContext> = None;
        let mut step = 0;
        loop {
            let (node_id, parent) = {
                let state = self.lock().await;
                let context = state.context.resolved();
                if walked.as_ref() != Some(&context) {
                    if walked.is_some() {
                        debug!(level = %context.level(), "route changed while loading, following it");
                    }
                    walked = Some(context.clone());
                    step = 0;
                }
                let deepest = context.level().min(Level::User);
                let Some(level) = PATH_LEVELS.get(step).copied().filter(|level| *level <= deepest)
                else {
                    return Ok(());
                };
                let Some(node_id) = context.node_id_at(level) else {
                    return Ok(());
                };
                (node_id, context.truncated(level))
            };
            step += 1;
            self.ensure_children(&node_id, parent).await?;
        }
    }

    /// Loads the company root from the project list, unless a tree already exists.
    ///
    /// A cached project list is reused before asking the gateway.
    async fn ensure_company(&self) -> Result<(), NavigationError> {
        {
            let mut state = self.lock().await;
            if !state.tree.is_empty() {
                return Ok(());
            }
            if let Some(EntityList::Projects(projects)) =
                state.cache.get(&NodeId::company(), EntityKind::Project).cloned()
            {
                debug!("rebuilding company from cached projects");
                install_company(&mut state, &projects);
                self.persist(&state);
                return Ok(());
            }
        }
        self.load_company().await
    }

    /// Fetches the project list and replaces the tree with a fresh company root.
    ///
    /// Cached child lists are re-attached and expansions that still match a node are kept, so
    /// a reload does not refetch or collapse what was already open.
    pub async fn load_company(&self) -> Result<(), NavigationError> {
        let company = NodeId::company();
        let (identity, epoch) = {
            let mut state = self.lock().await;
            if state.in_flight.contains(&company) {
                return Ok(());
            }
            let Some(identity) = state.identity.clone() else {
                let err = NavigationError::NotSignedIn;
                state.record_error(&company, &err);
                return Err(err);
            };
            state.in_flight.insert(company.clone());
            state.is_loading = true;
            state.tree.set_loading(&company, true);
            (identity, state.epoch)
        };

        let result = self
            .fetch_with_refresh(&company, EntityKind::Project, &NavigationContext::company(), identity, epoch)
            .await;

        let mut state = self.lock().await;
        if state.epoch != epoch {
            debug!("dropping project list from a previous session");
            return Ok(());
        }
        state.in_flight.remove(&company);
        state.is_loading = false;
        state.tree.set_loading(&company, false);

        let list = match result.and_then(|list| expect_kind(&company, EntityKind::Project, list)) {
            Ok(list) => list,
            Err(err) => {
                state.record_error(&company, &err);
                return Err(err);
            }
        };
        let EntityList::Projects(projects) = &list else {
            return Ok(());
        };
        install_company(&mut state, projects);
        state.cache.insert(company.clone(), list);
        state.errors.remove(&company);
        self.persist(&state);
        Ok(())
    }

    /// Makes sure `node_id` has its children, from the cache or the gateway.
    async fn ensure_children(
        &self,
        node_id: &NodeId,
        parent: NavigationContext,
    ) -> Result<(), NavigationError> {
        let pending = {
            let mut state = self.lock().await;
            match self.begin_load(&mut state, node_id)? {
                Some(pending) => pending,
                None => return Ok(()),
            }
        };

        debug!(node = %node_id, kind = %pending.kind, "loading children");
        let result = self
            .fetch_with_refresh(node_id, pending.kind, &parent, pending.identity, pending.epoch)
            .await;

        let mut state = self.lock().await;
        if state.epoch != pending.epoch {
            debug!(node = %node_id, "dropping list from a previous session");
            return Ok(());
        }
        state.in_flight.remove(node_id);
        state.tree.set_loading(node_id, false);

        let list = match result.and_then(|list| expect_kind(node_id, pending.kind, list)) {
            Ok(list) => list,
            Err(err) => {
                state.record_error(node_id, &err);
                return Err(err);
            }
        };

        let Some(node) = state.tree.find(node_id).cloned() else {
            debug!(node = %node_id, "parent left the tree while loading, dropping list");
            return Ok(());
        };
        let children = match build_child_nodes(&node, &list) {
            Ok(children) => children,
            Err(source) => {
                let err = NavigationError::Tree {
                    node_id: node_id.clone(),
                    source,
                };
                state.record_error(node_id, &err);
                return Err(err);
            }
        };
        state.tree.attach_children(node_id, children);
        state.cache.insert(node_id.clone(), list);
        state.errors.remove(node_id);
        self.persist(&state);
        Ok(())
    }

    /// Decides whether `node_id` needs a fetch. Cached lists are attached right away; nodes
    /// that already have children, are being loaded, or are leaves need nothing.
    fn begin_load(
        &self,
        state: &mut NavState,
        node_id: &NodeId,
    ) -> Result<Option<PendingLoad>, NavigationError> {
        let Some(node) = state.tree.find(node_id).cloned() else {
            return Ok(None);
        };
        let Some(kind) = EntityKind::children_of(node.kind()) else {
            return Ok(None);
        };
        if node.has_children() || state.in_flight.contains(node_id) {
            return Ok(None);
        }
        if let Some(list) = state.cache.get(node_id, kind).cloned() {
            match build_child_nodes(&node, &list) {
                Ok(children) => {
                    debug!(node = %node_id, "attaching cached children");
                    state.tree.attach_children(node_id, children);
                    return Ok(None);
                }
                Err(err) => warn!(node = %node_id, error = %err, "cached list does not fit, refetching"),
            }
        }
        let Some(identity) = state.identity.clone() else {
            let err = NavigationError::NotSignedIn;
            state.record_error(node_id, &err);
            return Err(err);
        };
        state.in_flight.insert(node_id.clone());
        state.tree.set_loading(node_id, true);
        Ok(Some(PendingLoad {
            kind,
            identity,
            epoch: state.epoch,
        }))
    }

    /// One gateway call; a rejected token is refreshed once and the call retried once.
    ///
    /// When the refresh fails the identity is dropped and the host is sent to the login page.
    async fn fetch_with_refresh(
        &self,
        node_id: &NodeId,
        kind: EntityKind,
        parent: &NavigationContext,
        identity: Identity,
        epoch: u64,
    ) -> Result<EntityList, NavigationError> {
        let gateway_error = |source: GatewayError| NavigationError::Gateway {
            node_id: node_id.clone(),
            source,
        };

        let err = match self.gateway.fetch_entities(kind, parent, &identity).await {
            Ok(list) => return Ok(list),
            Err(err) => err,
        };
        if !err.is_unauthorized() {
            return Err(gateway_error(err));
        }

        debug!(node = %node_id, "token rejected, refreshing credentials");
        let fresh = match self.refresher.refresh(&identity).await {
            Ok(fresh) => fresh,
            Err(refresh_err) => {
                warn!(error = %refresh_err, "credential refresh failed");
                self.expire_session(epoch).await;
                return Err(NavigationError::SessionExpired);
            }
        };
        {
            let mut state = self.lock().await;
            if state.epoch == epoch {
                state.identity = Some(fresh.clone());
            }
        }

        self.gateway.fetch_entities(kind, parent, &fresh).await.map_err(gateway_error)
    }

    async fn expire_session(&self, epoch: u64) {
        {
            let mut state = self.lock().await;
            if state.epoch != epoch {
                return;
            }
            state.identity = None;
        }
        if let Err(err) = self.routes.push(&self.config.login_path).await {
            warn!(error = %err, "redirect to login failed");
        }
    }

    /// Marks the node loading and active, awaits the route transition, then clears loading
    /// whatever the transition's outcome.
    pub async fn handle_node_click(&self, node_id: &NodeId, href: &str) -> Result<(), NavigationError> {
        {
            let mut state = self.lock().await;
            state.tree.set_loading(node_id, true);
            state.tree.set_active(node_id);
        }

        let result = self.routes.push(href).await;

        self.lock().await.tree.set_loading(node_id, false);
        result.map_err(|err| {
            warn!(href, error = %err, "navigation failed");
            NavigationError::Route(err)
        })
    }

    /// Flips the node's expansion. Never fetches.
    pub async fn toggle_node_expansion(&self, node_id: &NodeId) {
        let mut state = self.lock().await;
        state.tree.toggle_expansion(node_id);
        self.persist(&state);
    }

    /// Pushes the canonical href for `level`, or `/app` when `ids` do not reach that level.
    pub async fn navigate_to(&self, level: Level, ids: &NavigationContext) -> Result<String, NavigationError> {
        let href = routes::navigation_target(level, ids);
        self.routes.push(&href).await?;
        Ok(href)
    }

    /// Pushes the href one level above the current context; `None` at the company root.
    pub async fn navigate_up(&self) -> Result<Option<String>, NavigationError> {
        let Some(parent) = self.lock().await.context.parent() else {
            return Ok(None);
        };
        let href = parent.href();
        self.routes.push(&href).await?;
        Ok(Some(href))
    }

    /// Expands the company root and the current context's nodes down to `level`.
    pub async fn expand_to_level(&self, level: Level) {
        let mut state = self.lock().await;
        let path: Vec<NodeId> = Level::ALL
            .into_iter()
            .filter(|candidate| *candidate <= level.min(Level::User))
            .filter_map(|candidate| state.context.node_id_at(candidate))
            .collect();
        state.tree.expand_path(&path);
        self.persist(&state);
    }

    pub async fn collapse_all(&self) {
        let mut state = self.lock().await;
        state.tree.collapse_all();
        self.persist(&state);
    }

    /// Flips disclosure of the child list under `node_id`; returns the new state.
    pub async fn toggle_list(&self, node_id: &NodeId) -> bool {
        let mut state = self.lock().await;
        if state.list_expanded.remove(node_id) {
            false
        } else {
            state.list_expanded.insert(node_id.clone());
            true
        }
    }

    /// Stores the identity and forgets the last reconciled route, so observing a route that was
    /// first seen while signed out loads its lists.
    pub async fn sign_in(&self, identity: Identity) {
        let mut state = self.lock().await;
        debug!(email = %identity.email, "signed in");
        state.identity = Some(identity);
        state.errors.clear();
        state.last_reconciled = None;
    }

    /// Logout: empties the tree and forgets context, expansions, lists, cache, errors and
    /// identity. In-flight loads are dropped when they land. The theme preference is kept.
    pub async fn sign_out(&self) {
        let mut state = self.lock().await;
        state.epoch += 1;
        state.identity = None;
        state.tree.replace_root(Vec::new());
        state.tree.collapse_all();
        state.context = NavigationContext::default();
        state.last_reconciled = None;
        state.breadcrumbs = breadcrumbs::generate(&state.context);
        state.list_expanded.clear();
        state.cache.clear();
        state.in_flight.clear();
        state.errors.clear();
        state.is_loading = false;
        self.persist(&state);
        debug!("signed out");
    }

    pub async fn set_dark_mode(&self, is_dark_mode: bool) {
        let mut state = self.lock().await;
        state.is_dark_mode = is_dark_mode;
        self.persist(&state);
    }

    pub async fn toggle_theme(&self) -> bool {
        let mut state = self.lock().await;
        state.is_dark_mode = !state.is_dark_mode;
        self.persist(&state);
        state.is_dark_mode
    }
}

fn expect_kind(node_id: &NodeId, expected: EntityKind, list: EntityList) -> Result<EntityList, NavigationError> {
    if list.kind() == expected {
        return Ok(list);
    }
    Err(NavigationError::Gateway {
        node_id: node_id.clone(),
        source: GatewayError::KindMismatch {
            expected,
            actual: list.kind(),
        },
    })
}

/// Replaces the tree with a company root built from `projects`, then restores cached subtrees,
/// surviving expansions and the current context's path.
fn install_company(state: &mut NavState, projects: &[ProjectSummary]) {
    let previously_expanded: Vec<NodeId> = state.tree.expanded().iter().cloned().collect();
    state.tree.replace_root(vec![build_company_node(projects)]);
    state.reattach_cached();

    let present = node_ids(state.tree.tree());
    let kept: Vec<NodeId> = previously_expanded
        .into_iter()
        .filter(|node_id| present.contains(node_id))
        .collect();
    state.tree.expand_path(&kept);
    state.reveal_current();
}
