use std::sync::Arc;
use std::time::Duration;

use smartbin_core::{monitor::LiveStatusMonitor, service::SmartBinService};

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub(crate) enum Route {
    Dashboard,
    LiveBins,
    Prediction,
}

impl Route {
    pub(crate) const ALL: [Route; 3] = [Route::Dashboard, Route::LiveBins, Route::Prediction];

    pub(crate) fn path(self) -> &'static str {
        match self {
            Route::Dashboard => "/",
            Route::LiveBins => "/live-bins",
            Route::Prediction => "/prediction",
        }
    }

    pub(crate) fn label(self) -> &'static str {
        match self {
            Route::Dashboard => "Dashboard",
            Route::LiveBins => "Live Bins",
            Route::Prediction => "Prediction",
        }
    }

    pub(crate) fn index(self) -> usize {
        match self {
            Route::Dashboard => 0,
            Route::LiveBins => 1,
            Route::Prediction => 2,
        }
    }

    pub(crate) fn next(self) -> Self {
        match self {
            Route::Dashboard => Route::LiveBins,
            Route::LiveBins => Route::Prediction,
            Route::Prediction => Route::Dashboard,
        }
    }

    pub(crate) fn previous(self) -> Self {
        match self {
            Route::Dashboard => Route::Prediction,
            Route::LiveBins => Route::Dashboard,
            Route::Prediction => Route::LiveBins,
        }
    }
}

pub(crate) struct App {
    pub service: Arc<SmartBinService>,
    pub poll_interval: Duration,

    pub route: Route,
    /// Present exactly while [`Route::LiveBins`] is active.
    pub monitor: Option<LiveStatusMonitor>,

    /// First visible row of the bin grid.
    pub scroll: usize,
    /// Last row `scroll` may reach, as measured by the most recent draw.
    pub scroll_limit: usize,
    pub tick: usize,
}

impl App {
    pub(crate) fn new(service: Arc<SmartBinService>, poll_interval: Duration) -> Self {
        Self {
            service,
            poll_interval,
            route: Route::Dashboard,
            monitor: None,
            scroll: 0,
            scroll_limit: 0,
            tick: 0,
        }
    }

    /// Switch views, mounting or unmounting the live monitor as needed.
    pub(crate) fn navigate(&mut self, route: Route) {
        if route == self.route && (route != Route::LiveBins || self.monitor.is_some()) {
            return;
        }

        if self.monitor.take().is_some() {
            tracing::info!(from = self.route.path(), "unmounted live bin monitor");
        }
        if route == Route::LiveBins {
            self.monitor = Some(LiveStatusMonitor::mount(
                Arc::clone(&self.service),
                self.poll_interval,
            ));
        }

        self.route = route;
        self.scroll = 0;
        self.scroll_limit = 0;
    }

    /// Pull finished polls into the monitor state.
    pub(crate) fn refresh(&mut self) -> bool {
        self.monitor
            .as_mut()
            .is_some_and(LiveStatusMonitor::refresh)
    }

    pub(crate) fn on_tick(&mut self) {
        self.tick = self.tick.wrapping_add(1);
    }

    pub(crate) fn scroll_up(&mut self) {
        self.scroll = self.scroll.saturating_sub(1);
    }

    pub(crate) fn scroll_down(&mut self) {
        if self.scroll < self.scroll_limit {
            self.scroll += 1;
        }
    }

    /// Record how far the grid can scroll at the current size and bin count.
    pub(crate) fn set_scroll_limit(&mut self, limit: usize) {
        self.scroll_limit = limit;
        self.scroll = self.scroll.min(limit);
    }
}

#[cfg(test)]
mod tests {
    use smartbin_core::{
        ports::BinStatusPort,
        testing::{ScriptedPort, bin, response},
    };

    use super::*;

    const PERIOD: Duration = Duration::from_millis(5000);

    fn app_with(port: &Arc<ScriptedPort>) -> App {
        let shared: Arc<dyn BinStatusPort> = port.clone();
        let service = Arc::new(SmartBinService::new(shared));
        App::new(service, PERIOD)
    }

    #[test]
    fn routes_cycle_in_nav_order() {
        for route in Route::ALL {
            assert_eq!(route.next().previous(), route);
            assert_eq!(Route::ALL.get(route.index()), Some(&route));
        }
        assert_eq!(Route::Prediction.next(), Route::Dashboard);
        assert_eq!(Route::LiveBins.path(), "/live-bins");
    }

    #[tokio::test(start_paused = true)]
    async fn live_route_mounts_and_unmounts_monitor() {
        let port = Arc::new(ScriptedPort::always(|| Ok(response(vec![bin("A", 80.0)]))));
        let mut app = app_with(&port);
        assert!(app.monitor.is_none());

        app.navigate(Route::LiveBins);
        let monitor = app.monitor.as_mut().expect("mounted on live route");
        assert!(monitor.wait_for_update().await);
        assert_eq!(monitor.status().bins().len(), 1);
        assert_eq!(port.calls(), 1);

        app.navigate(Route::Prediction);
        assert!(app.monitor.is_none());

        tokio::time::sleep(PERIOD * 2).await;
        assert_eq!(port.calls(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn revisiting_live_route_starts_fresh() {
        let port = Arc::new(ScriptedPort::always(|| Ok(response(vec![bin("A", 20.0)]))));
        let mut app = app_with(&port);

        app.navigate(Route::LiveBins);
        let monitor = app.monitor.as_mut().expect("mounted");
        assert!(monitor.wait_for_update().await);

        app.navigate(Route::Dashboard);
        app.navigate(Route::LiveBins);

        let monitor = app.monitor.as_ref().expect("mounted again");
        assert!(monitor.status().is_loading());
    }

    #[test]
    fn scrolling_stops_at_last_row() {
        let port = Arc::new(ScriptedPort::always(|| Ok(response(Vec::new()))));
        let mut app = app_with(&port);
        app.set_scroll_limit(2);

        for _ in 0..5 {
            app.scroll_down();
        }
        assert_eq!(app.scroll, 2);

        app.scroll_up();
        assert_eq!(app.scroll, 1);
    }

    #[test]
    fn shrinking_limit_pulls_scroll_back() {
        let port = Arc::new(ScriptedPort::always(|| Ok(response(Vec::new()))));
        let mut app = app_with(&port);
        app.set_scroll_limit(3);
        app.scroll_down();
        app.scroll_down();
        app.scroll_down();

        app.set_scroll_limit(1);
        assert_eq!(app.scroll, 1);

        app.scroll_up();
        assert_eq!(app.scroll, 0);
    }
}
