use std::sync::{Arc, Mutex};
use std::time::Duration;

use chrono::Utc;
use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::api::{CatService, Order};
use crate::domain::{Breed, Cat, Category};
use crate::favorites::FavoritesStore;
use crate::feed::state::{FeedEvent, FeedState, ImageSize, LoadPhase};
use crate::query::{
    BreedQuery, BreedSort, CategoryQuery, CategorySort, GetBreeds, GetCategories, GetRandomCats,
    RandomCatsQuery,
};

pub const CATS_PER_PAGE: i32 = 10;
pub const SEARCH_DEBOUNCE: Duration = Duration::from_millis(500);

const LARGE_MIN_WIDTH: i32 = 800;
const LARGE_MIN_HEIGHT: i32 = 600;
const BREED_MENU_LIMIT: i32 = 50;

/// Owns the [`FeedState`] and is its only writer.
///
/// Events go in through [`dispatch`](Self::dispatch); snapshots come out
/// through [`subscribe`](Self::subscribe). Fetches run as spawned tasks,
/// so dispatching never blocks; completion handlers funnel their results
/// back through the same watch sender. Must be created inside a tokio
/// runtime.
pub struct FeedController {
    random_cats: GetRandomCats,
    breeds: GetBreeds,
    categories: GetCategories,
    favorites: Arc<dyn FavoritesStore>,
    state: watch::Sender<FeedState>,
    search: Mutex<SearchSlot>,
}

/// The at-most-one-concurrent-search invariant: each new search aborts
/// the previous job and bumps the generation; a completion handler only
/// applies its result while its generation is still current.
#[derive(Default)]
struct SearchSlot {
    generation: u64,
    job: Option<JoinHandle<()>>,
}

impl FeedController {
    pub fn new(service: Arc<dyn CatService>, favorites: Arc<dyn FavoritesStore>) -> Arc<Self> {
        let (state, _) = watch::channel(FeedState::default());
        let controller = Arc::new(Self {
            random_cats: GetRandomCats::new(service.clone()),
            breeds: GetBreeds::new(service.clone()),
            categories: GetCategories::new(service),
            favorites,
            state,
            search: Mutex::new(SearchSlot::default()),
        });
        controller.mirror_favorites();
        controller
    }

    /// Observable snapshot stream of the feed state.
    pub fn subscribe(&self) -> watch::Receiver<FeedState> {
        self.state.subscribe()
    }

    pub fn snapshot(&self) -> FeedState {
        self.state.borrow().clone()
    }

    /// Kick off the initial load: first feed page plus both filter menus.
    pub fn start(self: &Arc<Self>) {
        tracing::debug!("Loading initial data");
        self.dispatch(FeedEvent::LoadRandomCats);
        self.dispatch(FeedEvent::LoadBreeds);
        self.dispatch(FeedEvent::LoadCategories);
    }

    /// Single entry point for all state mutation.
    pub fn dispatch(self: &Arc<Self>, event: FeedEvent) {
        match event {
            FeedEvent::LoadRandomCats => self.load_random_cats(true),
            FeedEvent::LoadMoreCats => self.load_more_cats(),
            FeedEvent::Refresh => self.refresh(),
            FeedEvent::SearchBreeds(query) => self.search_breeds(query),
            FeedEvent::SelectBreed(breed) => self.select_breed(breed),
            FeedEvent::SelectCategory(category) => self.select_category(category),
            FeedEvent::ToggleFavorite(cat_id) => self.toggle_favorite(&cat_id),
            FeedEvent::ChangeImageSize(size) => self.change_image_size(size),
            FeedEvent::ToggleShowOnlyWithBreeds(show) => self.toggle_show_only_with_breeds(show),
            FeedEvent::ClearError => self.state.send_modify(|s| s.error_message = None),
            FeedEvent::LoadBreeds => self.load_breeds(),
            FeedEvent::LoadCategories => self.load_categories(),
        }
    }

    /// One-way merge of the favorites stream into the owned state.
    fn mirror_favorites(self: &Arc<Self>) {
        let this = self.clone();
        tokio::spawn(async move {
            let mut rx = this.favorites.observe();
            loop {
                let ids = rx.borrow_and_update().clone();
                this.state.send_modify(|s| s.favorite_ids = ids);
                if rx.changed().await.is_err() {
                    break;
                }
            }
        });
    }

    fn load_random_cats(self: &Arc<Self>, reset: bool) {
        self.state.send_modify(|s| {
            if reset {
                s.phase = LoadPhase::LoadingInitial;
                s.error_message = None;
                s.current_page = 0;
            } else {
                s.phase = LoadPhase::LoadingMore;
            }
        });

        let snapshot = self.snapshot();
        tracing::debug!(
            reset,
            breed = snapshot.selected_breed.as_ref().map(|b| b.name.as_str()),
            category = snapshot.selected_category.as_ref().map(|c| c.name.as_str()),
            only_with_breeds = snapshot.show_only_with_breeds,
            "Loading cats"
        );

        let this = self.clone();
        tokio::spawn(async move {
            let query = derive_feed_query(&snapshot);
            match this.random_cats.run(query).await {
                Ok(new_cats) => this.apply_page(&snapshot, new_cats, reset),
                Err(err) => {
                    tracing::error!(error = %err, "Failed to load cats");
                    this.state.send_modify(|s| {
                        s.phase = LoadPhase::Failed;
                        s.error_message = Some(err.user_message());
                    });
                }
            }
        });
    }

    /// Merge a fetched page into state and recompute the paging heuristic.
    fn apply_page(&self, snapshot: &FeedState, new_cats: Vec<Cat>, reset: bool) {
        let fetched = new_cats.len();
        let has_more = has_more_data(snapshot, fetched);
        tracing::debug!(fetched, has_more, "Loaded page");

        let next_page = snapshot.current_page + 1;
        self.state.send_modify(|s| {
            if reset {
                s.items = new_cats;
            } else {
                s.items.extend(new_cats);
            }
            s.phase = LoadPhase::Ready;
            s.error_message = None;
            s.has_more_data = has_more;
            s.current_page = next_page;
            s.total_cats_loaded = s.items.len();
            s.last_refresh_time = Some(Utc::now());
        });
    }

    fn load_more_cats(self: &Arc<Self>) {
        let (loading, has_more) = {
            let state = self.state.borrow();
            (state.phase.is_loading(), state.has_more_data)
        };
        if loading || !has_more {
            tracing::debug!(loading, has_more, "Cannot load more cats");
            return;
        }
        self.load_random_cats(false);
    }

    fn refresh(self: &Arc<Self>) {
        tracing::debug!("Refreshing cat list");
        self.state.send_modify(|s| {
            s.current_page = 0;
            s.has_more_data = true;
        });
        self.load_random_cats(true);
    }

    fn select_breed(self: &Arc<Self>, breed: Option<Breed>) {
        tracing::debug!(breed = breed.as_ref().map(|b| b.name.as_str()), "Selected breed");
        self.state.send_modify(|s| {
            // Filters compose: selecting a breed keeps the category
            s.selected_breed = breed;
            s.current_page = 0;
            s.has_more_data = true;
        });
        self.load_random_cats(true);
    }

    fn select_category(self: &Arc<Self>, category: Option<Category>) {
        tracing::debug!(
            category = category.as_ref().map(|c| c.name.as_str()),
            "Selected category"
        );
        self.state.send_modify(|s| {
            s.selected_category = category;
            s.current_page = 0;
            s.has_more_data = true;
        });
        self.load_random_cats(true);
    }

    fn change_image_size(self: &Arc<Self>, size: ImageSize) {
        tracing::debug!(size = size.display_name(), "Changing image size");
        self.state.send_modify(|s| {
            s.image_size = size;
            s.current_page = 0;
            s.has_more_data = true;
        });
        self.load_random_cats(true);
    }

    fn toggle_show_only_with_breeds(self: &Arc<Self>, show: bool) {
        tracing::debug!(show, "Toggle show only with breeds");
        self.state.send_modify(|s| {
            s.show_only_with_breeds = show;
            s.current_page = 0;
            s.has_more_data = true;
        });
        self.load_random_cats(true);
    }

    fn load_breeds(self: &Arc<Self>) {
        let this = self.clone();
        tokio::spawn(async move {
            let query = BreedQuery {
                limit: Some(BREED_MENU_LIMIT),
                sort_by: Some(BreedSort::Name),
                ..BreedQuery::default()
            };
            match this.breeds.run(query).await {
                Ok(breeds) => {
                    tracing::debug!("Loaded {} breeds", breeds.len());
                    this.state.send_modify(|s| s.breeds = breeds);
                }
                // Menu data is supplementary: keep whatever we had
                Err(err) => tracing::warn!(error = %err, "Failed to load breeds"),
            }
        });
    }

    fn load_categories(self: &Arc<Self>) {
        let this = self.clone();
        tokio::spawn(async move {
            let query = CategoryQuery {
                sort_by: Some(CategorySort::Name),
                ..CategoryQuery::default()
            };
            match this.categories.run(query).await {
                Ok(categories) => {
                    tracing::debug!("Loaded {} categories", categories.len());
                    this.state.send_modify(|s| s.categories = categories);
                }
                Err(err) => tracing::warn!(error = %err, "Failed to load categories"),
            }
        });
    }

    fn search_breeds(self: &Arc<Self>, query: String) {
        let blank = query.trim().is_empty();
        self.state.send_modify(|s| {
            s.search_query = query.clone();
            s.is_searching = !blank;
        });

        let mut slot = self.search.lock().expect("search slot poisoned");
        slot.generation += 1;
        if let Some(job) = slot.job.take() {
            job.abort();
        }

        if blank {
            drop(slot);
            self.load_breeds();
            return;
        }

        let generation = slot.generation;
        let this = self.clone();
        slot.job = Some(tokio::spawn(async move {
            tokio::time::sleep(SEARCH_DEBOUNCE).await;

            let result = this.breeds.search(&query).await;
            // A newer search may have been scheduled while the response
            // was in flight; its abort can race this resume point.
            if !this.search_is_current(generation) {
                return;
            }
            match result {
                Ok(breeds) => {
                    tracing::debug!("Found {} breeds for query: {}", breeds.len(), query);
                    this.state.send_modify(|s| {
                        s.breeds = breeds;
                        s.is_searching = false;
                    });
                }
                Err(err) => {
                    tracing::warn!(error = %err, "Failed to search breeds");
                    this.state.send_modify(|s| s.is_searching = false);
                }
            }
        }));
    }

    fn search_is_current(&self, generation: u64) -> bool {
        self.search
            .lock()
            .map(|slot| slot.generation == generation)
            .unwrap_or(false)
    }

    fn toggle_favorite(&self, cat_id: &str) {
        tracing::debug!(cat_id, "Toggling favorite");
        if let Err(err) = self.favorites.toggle(cat_id) {
            tracing::error!(error = %err, "Failed to toggle favorite");
        }
    }
}

/// Derive the next fetch from the current filter state. Deterministic
/// ascending order whenever a filter is active, so pages stay stable
/// across the pagination sequence; random order otherwise.
fn derive_feed_query(state: &FeedState) -> RandomCatsQuery {
    let order = if state.has_active_filters() {
        Order::Asc
    } else {
        Order::Random
    };
    RandomCatsQuery {
        limit: CATS_PER_PAGE,
        size: Some(state.image_size.api_value().to_string()),
        order: Some(order),
        page: Some(state.current_page as i32),
        category_ids: state.selected_category.as_ref().map(|c| c.id.to_string()),
        breed_ids: state.selected_breed.as_ref().map(|b| b.id.clone()),
        prefer_breeds_with_info: state.show_only_with_breeds,
        min_width: (state.image_size == ImageSize::Large).then_some(LARGE_MIN_WIDTH),
        min_height: (state.image_size == ImageSize::Large).then_some(LARGE_MIN_HEIGHT),
        include_breeds: Some(true),
        include_categories: Some(true),
        ..RandomCatsQuery::default()
    }
}

/// Paging heuristic: filtered queries return sparse pages even when more
/// data exists, so they pass with half a page; unfiltered queries must
/// fill the page exactly.
fn has_more_data(state: &FeedState, fetched: usize) -> bool {
    if state.has_active_filters() {
        fetched >= (CATS_PER_PAGE / 2) as usize
    } else {
        fetched == CATS_PER_PAGE as usize
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::collections::{HashMap, VecDeque};
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;

    use crate::api::{ImageQuery, ImageUpload};
    use crate::app::{Result, WhiskerError};
    use crate::favorites::SqliteFavorites;

    /// Scriptable [`CatService`]: queued responses, recorded calls and
    /// per-query delays for latency-reordering scenarios.
    #[derive(Default)]
    struct MockService {
        image_pages: Mutex<VecDeque<Result<Vec<Cat>>>>,
        image_delays: Mutex<VecDeque<Duration>>,
        image_calls: AtomicUsize,
        last_image_query: Mutex<Option<ImageQuery>>,
        breed_lists: Mutex<VecDeque<Result<Vec<Breed>>>>,
        category_lists: Mutex<VecDeque<Result<Vec<Category>>>>,
        search_log: Mutex<Vec<String>>,
        search_delays: Mutex<HashMap<String, Duration>>,
    }

    impl MockService {
        fn push_page(&self, cats: Vec<Cat>) {
            self.image_pages.lock().unwrap().push_back(Ok(cats));
        }

        fn push_page_error(&self, err: WhiskerError) {
            self.image_pages.lock().unwrap().push_back(Err(err));
        }

        fn image_calls(&self) -> usize {
            self.image_calls.load(Ordering::SeqCst)
        }

        fn searches(&self) -> Vec<String> {
            self.search_log.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl CatService for MockService {
        async fn search_images(&self, query: &ImageQuery) -> Result<Vec<Cat>> {
            self.image_calls.fetch_add(1, Ordering::SeqCst);
            *self.last_image_query.lock().unwrap() = Some(query.clone());
            let delay = self.image_delays.lock().unwrap().pop_front();
            if let Some(delay) = delay {
                tokio::time::sleep(delay).await;
            }
            self.image_pages
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Ok(Vec::new()))
        }

        async fn get_image(&self, _image_id: &str) -> Result<Cat> {
            unimplemented!("not used by the controller")
        }

        async fn upload_image(&self, _upload: &ImageUpload) -> Result<Cat> {
            unimplemented!("not used by the controller")
        }

        async fn delete_image(&self, _image_id: &str) -> Result<()> {
            unimplemented!("not used by the controller")
        }

        async fn list_breeds(
            &self,
            _attach_breed: Option<i32>,
            _page: Option<i32>,
            _limit: Option<i32>,
        ) -> Result<Vec<Breed>> {
            self.breed_lists
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Ok(vec![Breed::named("aby", "Abyssinian")]))
        }

        async fn search_breeds(&self, query: &str) -> Result<Vec<Breed>> {
            self.search_log.lock().unwrap().push(query.to_string());
            let delay = self.search_delays.lock().unwrap().get(query).copied();
            if let Some(delay) = delay {
                tokio::time::sleep(delay).await;
            }
            Ok(vec![Breed::named(query, &format!("{}-result", query))])
        }

        async fn list_categories(
            &self,
            _limit: Option<i32>,
            _page: Option<i32>,
        ) -> Result<Vec<Category>> {
            self.category_lists
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Ok(Vec::new()))
        }
    }

    fn cats(prefix: &str, count: usize) -> Vec<Cat> {
        (0..count)
            .map(|i| Cat {
                id: format!("{}-{}", prefix, i),
                image_url: format!("https://x/{}-{}.jpg", prefix, i),
                width: 640,
                height: 480,
                breeds: Vec::new(),
                categories: Vec::new(),
                sub_id: None,
                created_at: None,
                original_filename: None,
                breed_ids: None,
                pending: None,
                approved: None,
            })
            .collect()
    }

    fn controller(service: Arc<MockService>) -> Arc<FeedController> {
        let favorites = Arc::new(SqliteFavorites::in_memory().unwrap());
        FeedController::new(service, favorites)
    }

    async fn wait_for(
        rx: &mut watch::Receiver<FeedState>,
        pred: impl FnMut(&FeedState) -> bool,
    ) -> FeedState {
        tokio::time::timeout(Duration::from_secs(30), rx.wait_for(pred))
            .await
            .expect("timed out waiting for state")
            .expect("state channel closed")
            .clone()
    }

    #[tokio::test(start_paused = true)]
    async fn test_initial_load_replaces_items() {
        let service = Arc::new(MockService::default());
        service.push_page(cats("p1", 10));
        let controller = controller(service.clone());
        let mut rx = controller.subscribe();

        controller.dispatch(FeedEvent::LoadRandomCats);
        let state = wait_for(&mut rx, |s| s.phase == LoadPhase::Ready).await;

        assert_eq!(state.items.len(), 10);
        assert_eq!(state.current_page, 1);
        assert!(state.has_more_data);
        assert_eq!(state.total_cats_loaded, 10);
        assert!(state.last_refresh_time.is_some());
    }

    #[tokio::test(start_paused = true)]
    async fn test_load_more_appends_full_page() {
        let service = Arc::new(MockService::default());
        service.push_page(cats("p1", 10));
        service.push_page(cats("p2", 10));
        let controller = controller(service.clone());
        let mut rx = controller.subscribe();

        controller.dispatch(FeedEvent::LoadRandomCats);
        wait_for(&mut rx, |s| s.phase == LoadPhase::Ready).await;

        controller.dispatch(FeedEvent::LoadMoreCats);
        let state = wait_for(&mut rx, |s| s.items.len() == 20).await;

        assert_eq!(state.current_page, 2);
        assert!(state.has_more_data);
        // Append keeps the first page in front
        assert_eq!(state.items[0].id, "p1-0");
        assert_eq!(state.items[10].id, "p2-0");
    }

    #[tokio::test(start_paused = true)]
    async fn test_short_unfiltered_page_exhausts_feed() {
        let service = Arc::new(MockService::default());
        service.push_page(cats("p1", 7));
        let controller = controller(service.clone());
        let mut rx = controller.subscribe();

        controller.dispatch(FeedEvent::LoadRandomCats);
        let state = wait_for(&mut rx, |s| s.phase == LoadPhase::Ready).await;

        assert!(!state.has_more_data);
    }

    #[tokio::test(start_paused = true)]
    async fn test_filtered_half_page_still_has_more() {
        let service = Arc::new(MockService::default());
        service.push_page(cats("p1", 5));
        let controller = controller(service.clone());
        let mut rx = controller.subscribe();

        controller.dispatch(FeedEvent::SelectBreed(Some(Breed::named("siam", "Siamese"))));
        let state = wait_for(&mut rx, |s| s.phase == LoadPhase::Ready).await;

        assert_eq!(state.items.len(), 5);
        assert!(state.has_more_data);
    }

    #[tokio::test(start_paused = true)]
    async fn test_filtered_sparse_page_exhausts_feed() {
        let service = Arc::new(MockService::default());
        service.push_page(cats("p1", 4));
        let controller = controller(service.clone());
        let mut rx = controller.subscribe();

        controller.dispatch(FeedEvent::SelectBreed(Some(Breed::named("siam", "Siamese"))));
        let state = wait_for(&mut rx, |s| s.phase == LoadPhase::Ready).await;

        assert!(!state.has_more_data);
    }

    #[tokio::test(start_paused = true)]
    async fn test_filter_change_resets_and_replaces() {
        let service = Arc::new(MockService::default());
        service.push_page(cats("unfiltered", 10));
        service.push_page(cats("filtered", 6));
        let controller = controller(service.clone());
        let mut rx = controller.subscribe();

        controller.dispatch(FeedEvent::LoadRandomCats);
        wait_for(&mut rx, |s| s.items.len() == 10).await;

        controller.dispatch(FeedEvent::SelectCategory(Some(Category {
            id: 5,
            name: "boxes".into(),
        })));
        let state = wait_for(&mut rx, |s| {
            s.phase == LoadPhase::Ready && s.items.len() == 6
        })
        .await;

        // Replaced, not appended
        assert!(state.items.iter().all(|c| c.id.starts_with("filtered")));
        assert_eq!(state.current_page, 1);
        assert_eq!(
            state.selected_category.as_ref().map(|c| c.id),
            Some(5)
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_filters_compose() {
        let service = Arc::new(MockService::default());
        service.push_page(cats("a", 10));
        service.push_page(cats("b", 10));
        let controller = controller(service.clone());
        let mut rx = controller.subscribe();

        controller.dispatch(FeedEvent::SelectBreed(Some(Breed::named("siam", "Siamese"))));
        wait_for(&mut rx, |s| s.phase == LoadPhase::Ready).await;

        controller.dispatch(FeedEvent::SelectCategory(Some(Category {
            id: 1,
            name: "hats".into(),
        })));
        let state = wait_for(&mut rx, |s| s.items.iter().any(|c| c.id.starts_with("b"))).await;

        // Selecting a category must not clear the breed
        assert!(state.selected_breed.is_some());
        assert!(state.selected_category.is_some());

        let query = service.last_image_query.lock().unwrap().clone().unwrap();
        assert_eq!(query.breed_ids.as_deref(), Some("siam"));
        assert_eq!(query.category_ids.as_deref(), Some("1"));
        assert_eq!(query.order, Some(Order::Asc));
    }

    #[tokio::test(start_paused = true)]
    async fn test_unfiltered_feed_uses_random_order() {
        let service = Arc::new(MockService::default());
        service.push_page(cats("p1", 10));
        let controller = controller(service.clone());
        let mut rx = controller.subscribe();

        controller.dispatch(FeedEvent::LoadRandomCats);
        wait_for(&mut rx, |s| s.phase == LoadPhase::Ready).await;

        let query = service.last_image_query.lock().unwrap().clone().unwrap();
        assert_eq!(query.order, Some(Order::Random));
        assert_eq!(query.limit, Some(10));
        assert_eq!(query.page, Some(0));
        assert_eq!(query.include_breeds, Some(true));
        assert_eq!(query.include_categories, Some(true));
    }

    #[tokio::test(start_paused = true)]
    async fn test_large_size_requests_full_images() {
        let service = Arc::new(MockService::default());
        service.push_page(cats("p1", 10));
        let controller = controller(service.clone());
        let mut rx = controller.subscribe();

        controller.dispatch(FeedEvent::ChangeImageSize(ImageSize::Large));
        wait_for(&mut rx, |s| s.phase == LoadPhase::Ready).await;

        let query = service.last_image_query.lock().unwrap().clone().unwrap();
        assert_eq!(query.size.as_deref(), Some("full"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_load_more_guard_when_exhausted() {
        let service = Arc::new(MockService::default());
        service.push_page(cats("p1", 3));
        let controller = controller(service.clone());
        let mut rx = controller.subscribe();

        controller.dispatch(FeedEvent::LoadRandomCats);
        wait_for(&mut rx, |s| s.phase == LoadPhase::Ready).await;
        assert_eq!(service.image_calls(), 1);

        controller.dispatch(FeedEvent::LoadMoreCats);
        tokio::time::sleep(Duration::from_millis(50)).await;

        let state = controller.snapshot();
        assert_eq!(service.image_calls(), 1);
        assert_eq!(state.items.len(), 3);
        assert_eq!(state.current_page, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_load_more_guard_while_in_flight() {
        let service = Arc::new(MockService::default());
        service.push_page(cats("p1", 10));
        service.push_page(cats("p2", 10));
        service
            .image_delays
            .lock()
            .unwrap()
            .extend([Duration::ZERO, Duration::from_millis(300)]);
        let controller = controller(service.clone());
        let mut rx = controller.subscribe();

        controller.dispatch(FeedEvent::LoadRandomCats);
        wait_for(&mut rx, |s| s.phase == LoadPhase::Ready).await;

        controller.dispatch(FeedEvent::LoadMoreCats);
        // Duplicate while the first is still in flight: silently dropped
        controller.dispatch(FeedEvent::LoadMoreCats);
        let state = wait_for(&mut rx, |s| s.items.len() == 20).await;

        assert_eq!(service.image_calls(), 2);
        assert_eq!(state.current_page, 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_feed_failure_maps_message_and_keeps_items() {
        let service = Arc::new(MockService::default());
        service.push_page(cats("p1", 10));
        service.push_page_error(WhiskerError::Http {
            code: 500,
            message: "internal".into(),
        });
        let controller = controller(service.clone());
        let mut rx = controller.subscribe();

        controller.dispatch(FeedEvent::LoadRandomCats);
        wait_for(&mut rx, |s| s.phase == LoadPhase::Ready).await;

        controller.dispatch(FeedEvent::LoadMoreCats);
        let state = wait_for(&mut rx, |s| s.phase == LoadPhase::Failed).await;

        assert_eq!(
            state.error_message.as_deref(),
            Some("Server error. Please try again later.")
        );
        assert_eq!(state.items.len(), 10);

        controller.dispatch(FeedEvent::ClearError);
        let state = wait_for(&mut rx, |s| s.error_message.is_none()).await;
        assert_eq!(state.items.len(), 10);
    }

    #[tokio::test(start_paused = true)]
    async fn test_category_failure_is_silent() {
        let service = Arc::new(MockService::default());
        service.category_lists.lock().unwrap().push_back(Ok(vec![
            Category {
                id: 1,
                name: "boxes".into(),
            },
            Category {
                id: 2,
                name: "hats".into(),
            },
        ]));
        service
            .category_lists
            .lock()
            .unwrap()
            .push_back(Err(WhiskerError::Http {
                code: 404,
                message: "gone".into(),
            }));
        let controller = controller(service.clone());
        let mut rx = controller.subscribe();

        controller.dispatch(FeedEvent::LoadCategories);
        wait_for(&mut rx, |s| s.categories.len() == 2).await;

        controller.dispatch(FeedEvent::LoadCategories);
        tokio::time::sleep(Duration::from_millis(50)).await;

        let state = controller.snapshot();
        assert!(state.error_message.is_none());
        assert_eq!(state.categories.len(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_search_debounce_coalesces_to_latest_query() {
        let service = Arc::new(MockService::default());
        let controller = controller(service.clone());
        let mut rx = controller.subscribe();

        controller.dispatch(FeedEvent::SearchBreeds("a".into()));
        tokio::time::sleep(Duration::from_millis(100)).await;
        controller.dispatch(FeedEvent::SearchBreeds("ab".into()));

        let state = wait_for(&mut rx, |s| !s.is_searching && !s.breeds.is_empty()).await;

        // Exactly one remote call, for the newest query
        assert_eq!(service.searches(), vec!["ab".to_string()]);
        assert_eq!(state.breeds[0].name, "ab-result");
        assert_eq!(state.search_query, "ab");
    }

    #[tokio::test(start_paused = true)]
    async fn test_stale_slow_response_never_overwrites() {
        let service = Arc::new(MockService::default());
        service
            .search_delays
            .lock()
            .unwrap()
            .insert("a".into(), Duration::from_millis(1000));
        let controller = controller(service.clone());
        let mut rx = controller.subscribe();

        controller.dispatch(FeedEvent::SearchBreeds("a".into()));
        // Let the debounce elapse so the slow fetch for "a" is in flight
        tokio::time::sleep(Duration::from_millis(600)).await;
        assert_eq!(service.searches(), vec!["a".to_string()]);

        controller.dispatch(FeedEvent::SearchBreeds("ab".into()));
        let state = wait_for(&mut rx, |s| !s.breeds.is_empty() && !s.is_searching).await;
        assert_eq!(state.breeds[0].name, "ab-result");

        // Give the slow "a" response every chance to land late
        tokio::time::sleep(Duration::from_millis(2000)).await;
        let state = controller.snapshot();
        assert_eq!(state.breeds[0].name, "ab-result");
        assert_eq!(service.searches(), vec!["a".to_string(), "ab".to_string()]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_blank_search_cancels_and_reloads_menu() {
        let service = Arc::new(MockService::default());
        let controller = controller(service.clone());
        let mut rx = controller.subscribe();

        controller.dispatch(FeedEvent::SearchBreeds("a".into()));
        controller.dispatch(FeedEvent::SearchBreeds("".into()));

        let state = wait_for(&mut rx, |s| !s.breeds.is_empty()).await;

        // The pending "a" search was cancelled inside its debounce window
        assert!(service.searches().is_empty());
        assert_eq!(state.breeds[0].name, "Abyssinian");
        assert!(!state.is_searching);

        tokio::time::sleep(Duration::from_millis(1000)).await;
        assert!(service.searches().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_favorites_mirrored_into_state() {
        let service = Arc::new(MockService::default());
        let favorites = Arc::new(SqliteFavorites::in_memory().unwrap());
        let controller = FeedController::new(service, favorites.clone());
        let mut rx = controller.subscribe();

        // External writes show up through the subscription
        favorites.toggle("cat-1").unwrap();
        wait_for(&mut rx, |s| s.is_favorite("cat-1")).await;

        // And so do toggles dispatched through the controller
        controller.dispatch(FeedEvent::ToggleFavorite("cat-2".into()));
        wait_for(&mut rx, |s| s.is_favorite("cat-2")).await;

        controller.dispatch(FeedEvent::ToggleFavorite("cat-1".into()));
        let state = wait_for(&mut rx, |s| !s.is_favorite("cat-1")).await;
        assert!(state.is_favorite("cat-2"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_toggle_breed_info_resets_feed() {
        let service = Arc::new(MockService::default());
        service.push_page(cats("plain", 10));
        let mut with_info = cats("rich", 10);
        for cat in &mut with_info {
            cat.breeds = vec![Breed {
                description: Some("Fluffy and talkative".into()),
                ..Breed::named("siam", "Siamese")
            }];
        }
        service.push_page(with_info);
        let controller = controller(service.clone());
        let mut rx = controller.subscribe();

        controller.dispatch(FeedEvent::LoadRandomCats);
        wait_for(&mut rx, |s| s.items.len() == 10).await;

        controller.dispatch(FeedEvent::ToggleShowOnlyWithBreeds(true));
        let state = wait_for(&mut rx, |s| s.items.iter().any(|c| c.id.starts_with("rich"))).await;

        // Replaced with the filtered page, pagination rewound
        assert_eq!(state.items.len(), 10);
        assert!(state.items.iter().all(|c| c.id.starts_with("rich")));
        assert_eq!(state.current_page, 1);
        assert!(state.has_more_data);
    }

    #[tokio::test(start_paused = true)]
    async fn test_refresh_resets_pagination() {
        let service = Arc::new(MockService::default());
        service.push_page(cats("p1", 10));
        service.push_page(cats("p2", 10));
        service.push_page(cats("fresh", 10));
        let controller = controller(service.clone());
        let mut rx = controller.subscribe();

        controller.dispatch(FeedEvent::LoadRandomCats);
        wait_for(&mut rx, |s| s.items.len() == 10).await;
        controller.dispatch(FeedEvent::LoadMoreCats);
        wait_for(&mut rx, |s| s.items.len() == 20).await;

        controller.dispatch(FeedEvent::Refresh);
        let state = wait_for(&mut rx, |s| {
            s.phase == LoadPhase::Ready && s.items.len() == 10
        })
        .await;

        assert!(state.items.iter().all(|c| c.id.starts_with("fresh")));
        assert_eq!(state.current_page, 1);
    }
}
