//! Core types for titan-layout.
//!
//! These types define the foundation that everything builds on: the tagged
//! style value, the closed enumerations a host binds to, and the small
//! geometry containers the algorithm passes around.

use crate::error::LayoutError;

// =============================================================================
// Value - Supports undefined, absolute, percentage and auto
// =============================================================================

/// A style scalar.
///
/// - `Undefined`: not set; resolves to "unknown", never to zero
/// - `Point(n)`: absolute size in points
/// - `Percent(n)`: percentage of the reference size (0-100)
/// - `Auto`: content- or context-determined
///
/// # Examples
///
/// ```
/// use titan_layout::Value;
///
/// assert_eq!(Value::Point(50.0).resolve(Some(200.0)), Some(50.0));
/// assert_eq!(Value::Percent(50.0).resolve(Some(200.0)), Some(100.0));
/// assert_eq!(Value::Percent(50.0).resolve(None), None);
/// assert_eq!(Value::Auto.resolve(Some(200.0)), None);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum Value {
    /// Not set.
    #[default]
    Undefined,
    /// Absolute size in points.
    Point(f32),
    /// Percentage of the reference size.
    Percent(f32),
    /// Determined by content or context.
    Auto,
}

impl Value {
    /// Zero points, the default for unset margins, paddings and borders.
    pub const ZERO: Self = Self::Point(0.0);

    /// Resolve against a reference size.
    ///
    /// Percentages of an unknown reference are unknown, as are `Auto` and
    /// `Undefined`.
    #[inline]
    pub fn resolve(self, reference: Option<f32>) -> Option<f32> {
        match self {
            Self::Undefined | Self::Auto => None,
            Self::Point(v) => Some(v),
            Self::Percent(p) => reference.map(|r| p * r / 100.0),
        }
    }

    /// Resolve a margin: `Auto` margins occupy no space until distributed.
    #[inline]
    pub fn resolve_margin(self, reference: Option<f32>) -> Option<f32> {
        match self {
            Self::Auto => Some(0.0),
            other => other.resolve(reference),
        }
    }

    /// True for anything other than `Undefined`.
    #[inline]
    pub fn is_defined(self) -> bool {
        !matches!(self, Self::Undefined)
    }

    /// True for `Auto`.
    #[inline]
    pub fn is_auto(self) -> bool {
        matches!(self, Self::Auto)
    }

    /// NaN and infinite payloads collapse to `Undefined`.
    #[inline]
    pub fn sanitized(self) -> Self {
        match self {
            Self::Point(v) | Self::Percent(v) if !v.is_finite() => Self::Undefined,
            other => other,
        }
    }
}

impl From<f32> for Value {
    fn from(points: f32) -> Self {
        Self::Point(points).sanitized()
    }
}

// =============================================================================
// Size
// =============================================================================

/// A width/height pair.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Size<T> {
    pub width: T,
    pub height: T,
}

impl<T: Copy> Size<T> {
    /// Create a size.
    pub const fn new(width: T, height: T) -> Self {
        Self { width, height }
    }

    /// Read the component for a dimension.
    #[inline]
    pub fn get(&self, dimension: Dimension) -> T {
        match dimension {
            Dimension::Width => self.width,
            Dimension::Height => self.height,
        }
    }

    /// Write the component for a dimension.
    #[inline]
    pub fn set(&mut self, dimension: Dimension, value: T) {
        match dimension {
            Dimension::Width => self.width = value,
            Dimension::Height => self.height = value,
        }
    }
}

impl Size<f32> {
    pub const ZERO: Self = Self::new(0.0, 0.0);
}

// =============================================================================
// Enumerations
// =============================================================================

/// Declares a closed enumeration with a stable `u8` discriminant, a
/// lowercase name and binding-layer decoding.
macro_rules! layout_enum {
    (
        $(#[$meta:meta])*
        $name:ident {
            $( $(#[$vmeta:meta])* $variant:ident = $value:literal => $label:literal, )+
        }
        default $default:ident
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        #[repr(u8)]
        pub enum $name {
            $(
                $(#[$vmeta])*
                $variant = $value,
            )+
        }

        impl $name {
            /// Lowercase name as printed in debug dumps.
            pub const fn as_str(self) -> &'static str {
                match self {
                    $( Self::$variant => $label, )+
                }
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::$default
            }
        }

        impl TryFrom<u8> for $name {
            type Error = LayoutError;

            fn try_from(value: u8) -> Result<Self, Self::Error> {
                match value {
                    $( $value => Ok(Self::$variant), )+
                    _ => Err(LayoutError::InvalidEnumValue {
                        kind: stringify!($name),
                        value,
                    }),
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

layout_enum! {
    /// Layout direction for resolving start/end and row orientation.
    Direction {
        Inherit = 0 => "inherit",
        Ltr = 1 => "ltr",
        Rtl = 2 => "rtl",
    }
    default Inherit
}

layout_enum! {
    /// Main-axis orientation of a container.
    FlexDirection {
        Column = 0 => "column",
        ColumnReverse = 1 => "column-reverse",
        Row = 2 => "row",
        RowReverse = 3 => "row-reverse",
    }
    default Column
}

layout_enum! {
    /// Main-axis distribution of free space.
    Justify {
        FlexStart = 0 => "flex-start",
        Center = 1 => "center",
        FlexEnd = 2 => "flex-end",
        SpaceBetween = 3 => "space-between",
        SpaceAround = 4 => "space-around",
        SpaceEvenly = 5 => "space-evenly",
    }
    default FlexStart
}

layout_enum! {
    /// Cross-axis alignment for items, self and content.
    Align {
        Auto = 0 => "auto",
        FlexStart = 1 => "flex-start",
        Center = 2 => "center",
        FlexEnd = 3 => "flex-end",
        Stretch = 4 => "stretch",
        Baseline = 5 => "baseline",
        SpaceBetween = 6 => "space-between",
        SpaceAround = 7 => "space-around",
    }
    default Auto
}

layout_enum! {
    /// Whether a node takes part in flex layout.
    PositionType {
        Relative = 0 => "relative",
        Absolute = 1 => "absolute",
    }
    default Relative
}

layout_enum! {
    /// Line-breaking behaviour of a container.
    Wrap {
        NoWrap = 0 => "no-wrap",
        Wrap = 1 => "wrap",
        WrapReverse = 2 => "wrap-reverse",
    }
    default NoWrap
}

layout_enum! {
    /// Overflow behaviour; `Scroll` changes how content is measured.
    Overflow {
        Visible = 0 => "visible",
        Hidden = 1 => "hidden",
        Scroll = 2 => "scroll",
    }
    default Visible
}

layout_enum! {
    /// `None` removes the subtree from layout and zeroes its geometry.
    Display {
        Flex = 0 => "flex",
        None = 1 => "none",
    }
    default Flex
}

layout_enum! {
    /// How an available size constrains a node.
    MeasureMode {
        Undefined = 0 => "undefined",
        Exactly = 1 => "exactly",
        AtMost = 2 => "at-most",
    }
    default Undefined
}

layout_enum! {
    /// Text nodes never have their size rounded down.
    NodeType {
        Default = 0 => "default",
        Text = 1 => "text",
    }
    default Default
}

layout_enum! {
    /// Box edge selector for margin, padding, border and position.
    Edge {
        Left = 0 => "left",
        Top = 1 => "top",
        Right = 2 => "right",
        Bottom = 3 => "bottom",
        Start = 4 => "start",
        End = 5 => "end",
        Horizontal = 6 => "horizontal",
        Vertical = 7 => "vertical",
        All = 8 => "all",
    }
    default All
}

layout_enum! {
    /// Width or height.
    Dimension {
        Width = 0 => "width",
        Height = 1 => "height",
    }
    default Width
}

impl Edge {
    /// The four physical edges, in storage order.
    pub const PHYSICAL: [Self; 4] = [Self::Left, Self::Top, Self::Right, Self::Bottom];

    /// Index into a nine-slot edge array.
    #[inline]
    pub(crate) const fn index(self) -> usize {
        self as usize
    }
}

impl FlexDirection {
    #[inline]
    pub fn is_row(self) -> bool {
        matches!(self, Self::Row | Self::RowReverse)
    }

    #[inline]
    pub fn is_column(self) -> bool {
        matches!(self, Self::Column | Self::ColumnReverse)
    }

    #[inline]
    pub fn is_reverse(self) -> bool {
        matches!(self, Self::ColumnReverse | Self::RowReverse)
    }

    /// Edge where items start along this axis.
    #[inline]
    pub fn leading_edge(self) -> Edge {
        match self {
            Self::Column => Edge::Top,
            Self::ColumnReverse => Edge::Bottom,
            Self::Row => Edge::Left,
            Self::RowReverse => Edge::Right,
        }
    }

    /// Edge where items end along this axis.
    #[inline]
    pub fn trailing_edge(self) -> Edge {
        match self {
            Self::Column => Edge::Bottom,
            Self::ColumnReverse => Edge::Top,
            Self::Row => Edge::Right,
            Self::RowReverse => Edge::Left,
        }
    }

    /// Dimension measured along this axis.
    #[inline]
    pub fn dimension(self) -> Dimension {
        if self.is_row() {
            Dimension::Width
        } else {
            Dimension::Height
        }
    }

    /// Swap row orientation for right-to-left layout.
    #[inline]
    pub fn resolve(self, direction: Direction) -> Self {
        if direction == Direction::Rtl {
            match self {
                Self::Row => Self::RowReverse,
                Self::RowReverse => Self::Row,
                other => other,
            }
        } else {
            self
        }
    }

    /// The axis perpendicular to this one.
    #[inline]
    pub fn cross(self, direction: Direction) -> Self {
        if self.is_column() {
            Self::Row.resolve(direction)
        } else {
            Self::Column
        }
    }
}
