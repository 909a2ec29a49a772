use crate::domain::core::{Point, Rect};
use crate::domain::edge::ScreenEdge;
use thiserror::Error;

/// Defaults and limits for AppBar placement
pub struct AppBarConfig;

impl AppBarConfig {
    pub const DEFAULT_VISIBLE_MARGIN: f64 = 0.1;
    pub const DEFAULT_HIDDEN_MARGIN: f64 = 0.01;
    /// Prefix of the window message name registered for shell notifications
    pub const CALLBACK_MESSAGE_PREFIX: &'static str = "EdgeDock";
}

/// Where the monitor to dock on comes from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MonitorTarget {
    /// Monitor the host window currently overlaps most
    #[default]
    CurrentWindow,
    /// Monitor containing a point, e.g. where a drag was released
    ContainingPoint(Point),
    /// Monitor with these exact bounds
    Explicit(Rect),
}

/// What the caller wants the AppBar to look like
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DesiredAttributes {
    pub screen_edge: ScreenEdge,
    /// Fraction of the monitor's docked dimension covered when visible
    pub visible_margin: f64,
    /// Fraction covered while an auto-hide bar is hidden
    pub hidden_margin: f64,
    pub auto_hide: bool,
    pub target: MonitorTarget,
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("{name} must lie in (0, 1], got {value}")]
    InvalidMargin { name: &'static str, value: f64 },
    #[error("monitor rectangle {0} has no area")]
    InvalidMonitorRect(Rect),
    #[error("invalid argument '{argument}': {reason}")]
    InvalidArgument { argument: String, reason: String },
}

/// Checks that a margin lies in `(0, 1]`
pub fn validate_margin(name: &'static str, value: f64) -> Result<f64, ConfigError> {
    if value.is_finite() && value > 0.0 && value <= 1.0 {
        Ok(value)
    } else {
        Err(ConfigError::InvalidMargin { name, value })
    }
}

impl DesiredAttributes {
    /// Standard (always visible) bar on `edge` with default margins
    pub fn new(screen_edge: ScreenEdge) -> Self {
        Self {
            screen_edge,
            visible_margin: AppBarConfig::DEFAULT_VISIBLE_MARGIN,
            hidden_margin: AppBarConfig::DEFAULT_HIDDEN_MARGIN,
            auto_hide: false,
            target: MonitorTarget::default(),
        }
    }

    pub fn with_visible_margin(mut self, margin: f64) -> Self {
        self.visible_margin = margin;
        self
    }

    pub fn with_hidden_margin(mut self, margin: f64) -> Self {
        self.hidden_margin = margin;
        self
    }

    pub fn with_auto_hide(mut self, auto_hide: bool) -> Self {
        self.auto_hide = auto_hide;
        self
    }

    pub fn on_monitor(mut self, target: MonitorTarget) -> Self {
        self.target = target;
        self
    }

    /// Rejects caller mistakes before anything is sent to the shell
    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_margin("visible margin", self.visible_margin)?;
        validate_margin("hidden margin", self.hidden_margin)?;
        if let MonitorTarget::Explicit(rect) = self.target {
            if !rect.is_valid() {
                return Err(ConfigError::InvalidMonitorRect(rect));
            }
        }
        Ok(())
    }

    /// Parses `<edge> [auto-hide] [visible-margin] [hidden-margin]`
    ///
    /// `auto-hide` is `autohide`/`auto-hide` or `standard`. Margins are
    /// optional and validated.
    pub fn from_args<I, S>(args: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut args = args.into_iter();
        let edge_arg = args.next().ok_or_else(|| ConfigError::InvalidArgument {
            argument: String::new(),
            reason: "expected a screen edge (left, top, right, bottom)".to_string(),
        })?;
        let edge = edge_arg
            .as_ref()
            .parse::<ScreenEdge>()
            .map_err(|reason| ConfigError::InvalidArgument {
                argument: edge_arg.as_ref().to_string(),
                reason,
            })?;
        let mut desired = Self::new(edge);

        if let Some(mode) = args.next() {
            desired.auto_hide = match mode.as_ref() {
                "autohide" | "auto-hide" => true,
                "standard" => false,
                other => {
                    return Err(ConfigError::InvalidArgument {
                        argument: other.to_string(),
                        reason: "expected 'standard' or 'autohide'".to_string(),
                    });
                }
            };
        }

        if let Some(margin) = args.next() {
            desired.visible_margin = parse_margin(margin.as_ref())?;
        }
        if let Some(margin) = args.next() {
            desired.hidden_margin = parse_margin(margin.as_ref())?;
        }

        desired.validate()?;
        Ok(desired)
    }
}

fn parse_margin(value: &str) -> Result<f64, ConfigError> {
    value
        .parse::<f64>()
        .map_err(|e| ConfigError::InvalidArgument {
            argument: value.to_string(),
            reason: e.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let desired = DesiredAttributes::new(ScreenEdge::Top);
        assert!(desired.validate().is_ok());
        assert!(!desired.auto_hide);
        assert_eq!(desired.target, MonitorTarget::CurrentWindow);
    }

    #[test]
    fn margins_outside_unit_interval_are_rejected() {
        for bad in [0.0, -0.1, 1.01, f64::NAN, f64::INFINITY] {
            let desired = DesiredAttributes::new(ScreenEdge::Left).with_visible_margin(bad);
            assert!(
                matches!(desired.validate(), Err(ConfigError::InvalidMargin { .. })),
                "margin {bad} accepted"
            );
        }

        let desired = DesiredAttributes::new(ScreenEdge::Left).with_hidden_margin(0.0);
        assert!(matches!(
            desired.validate(),
            Err(ConfigError::InvalidMargin {
                name: "hidden margin",
                ..
            })
        ));
    }

    #[test]
    fn full_margin_is_accepted() {
        let desired = DesiredAttributes::new(ScreenEdge::Right)
            .with_visible_margin(1.0)
            .with_hidden_margin(1.0);
        assert!(desired.validate().is_ok());
    }

    #[test]
    fn degenerate_explicit_monitor_is_rejected() {
        let desired = DesiredAttributes::new(ScreenEdge::Top)
            .on_monitor(MonitorTarget::Explicit(Rect::new(0, 0, 0, 1080)));
        assert!(matches!(
            desired.validate(),
            Err(ConfigError::InvalidMonitorRect(_))
        ));
    }

    #[test]
    fn parses_command_line() {
        let desired = DesiredAttributes::from_args(["left", "autohide", "0.25", "0.02"]).unwrap();
        assert_eq!(desired.screen_edge, ScreenEdge::Left);
        assert!(desired.auto_hide);
        assert_eq!(desired.visible_margin, 0.25);
        assert_eq!(desired.hidden_margin, 0.02);

        let desired = DesiredAttributes::from_args(["bottom"]).unwrap();
        assert_eq!(desired.screen_edge, ScreenEdge::Bottom);
        assert_eq!(desired.visible_margin, AppBarConfig::DEFAULT_VISIBLE_MARGIN);
    }

    #[test]
    fn rejects_bad_arguments() {
        let empty: [&str; 0] = [];
        assert!(DesiredAttributes::from_args(empty).is_err());
        assert!(DesiredAttributes::from_args(["sideways"]).is_err());
        assert!(DesiredAttributes::from_args(["top", "sometimes"]).is_err());
        assert!(DesiredAttributes::from_args(["top", "standard", "abc"]).is_err());
        assert!(matches!(
            DesiredAttributes::from_args(["top", "standard", "1.5"]),
            Err(ConfigError::InvalidMargin { .. })
        ));
    }
}
