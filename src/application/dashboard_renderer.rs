// Dashboard renderer - Owns the active chart set and keeps a surface in sync with it
use crate::domain::chart::ChartSpec;
use crate::domain::error::DashboardError;

/// Anything that can display a column of chart panels.
pub trait DashboardSurface {
    /// Discard every panel and any error indicator.
    fn clear(&mut self);

    /// Draw one panel. Called in display order, after `clear`.
    fn draw_panel(&mut self, position: usize, spec: &ChartSpec);

    /// Show a visible error indicator without touching the drawn panels.
    fn show_error(&mut self, message: &str);
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct DashboardState {
    pub specs: Vec<ChartSpec>,
}

#[derive(Debug)]
enum Lifecycle {
    Uninitialized,
    Ready(DashboardState),
}

pub struct DashboardRenderer<S: DashboardSurface> {
    lifecycle: Lifecycle,
    surface: S,
}

impl<S: DashboardSurface> DashboardRenderer<S> {
    pub fn new(surface: S) -> Self {
        Self {
            lifecycle: Lifecycle::Uninitialized,
            surface,
        }
    }

    pub fn is_ready(&self) -> bool {
        matches!(self.lifecycle, Lifecycle::Ready(_))
    }

    /// Displayed specs in order; empty before `initialize`.
    pub fn specs(&self) -> &[ChartSpec] {
        match &self.lifecycle {
            Lifecycle::Ready(state) => state.specs.as_slice(),
            Lifecycle::Uninitialized => &[],
        }
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn initialize(&mut self, initial_specs: Vec<ChartSpec>) -> Result<(), DashboardError> {
        if let Err(e) = validate_all(&initial_specs) {
            return Err(self.reject("initialize", e));
        }
        if self.is_ready() {
            tracing::debug!("Re-initializing dashboard");
        }

        tracing::info!("Dashboard initialized with {} charts", initial_specs.len());
        self.lifecycle = Lifecycle::Ready(DashboardState { specs: initial_specs });
        self.render();
        Ok(())
    }

    /// Replace the whole chart set. Either every spec is accepted or none is.
    pub fn set_specs(&mut self, specs: Vec<ChartSpec>) -> Result<(), DashboardError> {
        let result = validate_all(&specs).and_then(|_| {
            let state = self.state_mut()?;
            state.specs = specs;
            Ok(state.specs.len())
        });

        match result {
            Ok(count) => {
                tracing::info!("Dashboard replaced with {} charts", count);
                self.render();
                Ok(())
            }
            Err(e) => Err(self.reject("set_specs", e)),
        }
    }

    pub fn add_spec(&mut self, spec: ChartSpec) -> Result<(), DashboardError> {
        let result = spec.validate().and_then(|_| {
            let state = self.state_mut()?;
            state.specs.push(spec);
            Ok(state.specs.len())
        });

        match result {
            Ok(count) => {
                tracing::info!("Chart added, dashboard now holds {} charts", count);
                self.render();
                Ok(())
            }
            Err(e) => Err(self.reject("add_spec", e)),
        }
    }

    /// Remove and return the chart at `index`, keeping the others in order.
    pub fn remove_spec(&mut self, index: usize) -> Result<ChartSpec, DashboardError> {
        let result = self.state_mut().and_then(|state| {
            let len = state.specs.len();
            if index >= len {
                return Err(DashboardError::IndexOutOfRange { index, len });
            }
            Ok(state.specs.remove(index))
        });

        match result {
            Ok(removed) => {
                tracing::info!("Chart {} ('{}') removed", index, removed.layout.title);
                self.render();
                Ok(removed)
            }
            Err(e) => Err(self.reject("remove_spec", e)),
        }
    }

    /// Show a rejection that happened before a mutation reached the renderer,
    /// e.g. a malformed request or a chart that failed to build.
    pub fn report_error(&mut self, operation: &str, message: &str) {
        tracing::warn!("Dashboard {} rejected: {}", operation, message);
        self.surface.show_error(message);
    }

    fn state_mut(&mut self) -> Result<&mut DashboardState, DashboardError> {
        match &mut self.lifecycle {
            Lifecycle::Ready(state) => Ok(state),
            Lifecycle::Uninitialized => Err(DashboardError::Uninitialized),
        }
    }

    fn render(&mut self) {
        self.surface.clear();
        if let Lifecycle::Ready(state) = &self.lifecycle {
            for (position, spec) in state.specs.iter().enumerate() {
                self.surface.draw_panel(position, spec);
            }
        }
    }

    fn reject(&mut self, operation: &str, error: DashboardError) -> DashboardError {
        tracing::warn!("Dashboard {} rejected: {}", operation, error);
        self.surface.show_error(&error.to_string());
        error
    }
}

fn validate_all(specs: &[ChartSpec]) -> Result<(), DashboardError> {
    specs.iter().enumerate().try_for_each(|(i, spec)| {
        spec.validate().map_err(|e| match e {
            DashboardError::InvalidInput(message) => {
                DashboardError::InvalidInput(format!("chart {}: {}", i, message))
            }
            other => other,
        })
    })
}
