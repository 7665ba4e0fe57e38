//! # Pallet Bill of Materials
//!
//! A [`Pallet`] groups one shipment's full bill of materials: deck boards,
//! lead boards and stringers, plus the shipping and build choices that the
//! calculators need.
//!
//! ## Structure
//!
//! ```text
//! Pallet
//! ├── deck_boards: Vec<Board>
//! ├── lead_boards: Vec<Board>
//! ├── stringers: Vec<Stringer>
//! ├── location_id / transportation_type / pallets_per_truck
//! ├── fastener_type, build_options, build_intricacy
//! └── results: Option<CalculationResults> (last computed snapshot)
//! ```
//!
//! ## Example
//!
//! ```rust
//! use pallet_core::pallet::{Board, Pallet, Stringer};
//!
//! let pallet = Pallet::new("p-1", "GMA 48x40")
//!     .with_deck_board(Board::new(7, 0.625, 3.5, 40.0, "SYP"))
//!     .with_lead_board(Board::new(2, 0.625, 5.5, 40.0, "SYP"))
//!     .with_stringer(Stringer::new(3, 3.5, 1.5, 48.0, "SYP"));
//!
//! assert_eq!(pallet.deck_board_count(), 7);
//! assert_eq!(pallet.stringer_count(), 3);
//! ```

use serde::{Deserialize, Serialize};

use crate::pricing::CalculationResults;

/// A dimensioned lumber piece that contributes board footage.
///
/// Boards use `thickness`; stringers expose their `height` in that role.
pub trait LumberComponent {
    /// Number of identical pieces
    fn count(&self) -> u32;
    /// Thickness in inches (height for stringers)
    fn thickness_in(&self) -> f64;
    /// Width in inches
    fn width_in(&self) -> f64;
    /// Length in inches
    fn length_in(&self) -> f64;
    /// Lumber type key into the settings price table (may be empty)
    fn lumber_type(&self) -> &str;
}

/// A deck or lead board row.
///
/// ## JSON Example
///
/// ```json
/// { "count": 7, "thickness": 0.625, "width": 3.5, "length": 40.0, "lumber_type": "SYP" }
/// ```
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Board {
    /// Number of boards in this row
    #[serde(default)]
    pub count: u32,

    /// Thickness in inches
    #[serde(default)]
    pub thickness: f64,

    /// Width in inches
    #[serde(default)]
    pub width: f64,

    /// Length in inches
    #[serde(default)]
    pub length: f64,

    /// Lumber type key (empty when not chosen yet)
    #[serde(default)]
    pub lumber_type: String,
}

impl Board {
    pub fn new(count: u32, thickness: f64, width: f64, length: f64, lumber_type: impl Into<String>) -> Self {
        Board {
            count,
            thickness,
            width,
            length,
            lumber_type: lumber_type.into(),
        }
    }
}

impl LumberComponent for Board {
    fn count(&self) -> u32 {
        self.count
    }
    fn thickness_in(&self) -> f64 {
        self.thickness
    }
    fn width_in(&self) -> f64 {
        self.width
    }
    fn length_in(&self) -> f64 {
        self.length
    }
    fn lumber_type(&self) -> &str {
        &self.lumber_type
    }
}

/// A stringer row. `height` plays the thickness role in board footage.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Stringer {
    #[serde(default)]
    pub count: u32,

    /// Height in inches
    #[serde(default)]
    pub height: f64,

    /// Width in inches
    #[serde(default)]
    pub width: f64,

    /// Length in inches
    #[serde(default)]
    pub length: f64,

    #[serde(default)]
    pub lumber_type: String,
}

impl Stringer {
    pub fn new(count: u32, height: f64, width: f64, length: f64, lumber_type: impl Into<String>) -> Self {
        Stringer {
            count,
            height,
            width,
            length,
            lumber_type: lumber_type.into(),
        }
    }
}

impl LumberComponent for Stringer {
    fn count(&self) -> u32 {
        self.count
    }
    fn thickness_in(&self) -> f64 {
        self.height
    }
    fn width_in(&self) -> f64 {
        self.width
    }
    fn length_in(&self) -> f64 {
        self.length
    }
    fn lumber_type(&self) -> &str {
        &self.lumber_type
    }
}

/// Nail type used to assemble the pallet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum FastenerType {
    #[default]
    #[serde(rename = "Standard")]
    Standard,
    #[serde(rename = "Automatic Nail")]
    AutomaticNail,
    #[serde(rename = "Specialty Nail")]
    SpecialtyNail,
}

impl FastenerType {
    pub const ALL: [FastenerType; 3] = [
        FastenerType::Standard,
        FastenerType::AutomaticNail,
        FastenerType::SpecialtyNail,
    ];

    /// Display label (matches the serialized form)
    pub fn label(&self) -> &'static str {
        match self {
            FastenerType::Standard => "Standard",
            FastenerType::AutomaticNail => "Automatic Nail",
            FastenerType::SpecialtyNail => "Specialty Nail",
        }
    }
}

/// Labor complexity tier, keyed by label into `build_intricacy_costs`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BuildIntricacy {
    #[serde(rename = "Automated")]
    Automated,
    #[serde(rename = "Manual Easy")]
    ManualEasy,
    #[serde(rename = "Manual Intricate")]
    ManualIntricate,
}

impl BuildIntricacy {
    pub const ALL: [BuildIntricacy; 3] = [
        BuildIntricacy::Automated,
        BuildIntricacy::ManualEasy,
        BuildIntricacy::ManualIntricate,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            BuildIntricacy::Automated => "Automated",
            BuildIntricacy::ManualEasy => "Manual Easy",
            BuildIntricacy::ManualIntricate => "Manual Intricate",
        }
    }
}

/// Optional finishing work. Priced once per pallet set, not per board foot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct BuildOptions {
    pub painted: bool,
    pub notched: bool,
    pub heat_treated: bool,
    pub bands: bool,
}

impl BuildOptions {
    /// True when no option is selected
    pub fn is_empty(&self) -> bool {
        !(self.painted || self.notched || self.heat_treated || self.bands)
    }
}

/// One pallet design and its shipping parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pallet {
    /// Session-assigned identifier (empty until added to a session)
    #[serde(default)]
    pub id: String,

    /// User label (e.g., "GMA 48x40")
    #[serde(default)]
    pub name: String,

    /// Shipping location this pallet is delivered to
    #[serde(default)]
    pub location_id: Option<String>,

    /// Vehicle type key (e.g., "Flatbed"), matched against settings
    #[serde(default)]
    pub transportation_type: Option<String>,

    /// How many of these pallets one truck carries
    #[serde(default)]
    pub pallets_per_truck: Option<u32>,

    #[serde(default)]
    pub deck_boards: Vec<Board>,

    #[serde(default)]
    pub lead_boards: Vec<Board>,

    #[serde(default)]
    pub stringers: Vec<Stringer>,

    #[serde(default)]
    pub fastener_type: FastenerType,

    #[serde(default)]
    pub build_options: BuildOptions,

    #[serde(default)]
    pub build_intricacy: Option<BuildIntricacy>,

    /// Last computed snapshot; cleared whenever inputs are edited
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub results: Option<CalculationResults>,
}

impl Pallet {
    /// Create an empty pallet.
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Pallet {
            id: id.into(),
            name: name.into(),
            location_id: None,
            transportation_type: None,
            pallets_per_truck: None,
            deck_boards: Vec::new(),
            lead_boards: Vec::new(),
            stringers: Vec::new(),
            fastener_type: FastenerType::default(),
            build_options: BuildOptions::default(),
            build_intricacy: None,
            results: None,
        }
    }

    pub fn with_deck_board(mut self, board: Board) -> Self {
        self.deck_boards.push(board);
        self
    }

    pub fn with_lead_board(mut self, board: Board) -> Self {
        self.lead_boards.push(board);
        self
    }

    pub fn with_stringer(mut self, stringer: Stringer) -> Self {
        self.stringers.push(stringer);
        self
    }

    /// Set the delivery location and vehicle type
    pub fn with_shipping(mut self, location_id: impl Into<String>, transportation_type: impl Into<String>) -> Self {
        self.location_id = Some(location_id.into());
        self.transportation_type = Some(transportation_type.into());
        self
    }

    pub fn with_pallets_per_truck(mut self, pallets_per_truck: u32) -> Self {
        self.pallets_per_truck = Some(pallets_per_truck);
        self
    }

    pub fn with_fastener(mut self, fastener_type: FastenerType) -> Self {
        self.fastener_type = fastener_type;
        self
    }

    pub fn with_options(mut self, options: BuildOptions) -> Self {
        self.build_options = options;
        self
    }

    pub fn with_intricacy(mut self, intricacy: BuildIntricacy) -> Self {
        self.build_intricacy = Some(intricacy);
        self
    }

    /// Sum of `count` across deck boards
    pub fn deck_board_count(&self) -> u64 {
        self.deck_boards.iter().map(|b| u64::from(b.count)).sum()
    }

    /// Sum of `count` across lead boards
    pub fn lead_board_count(&self) -> u64 {
        self.lead_boards.iter().map(|b| u64::from(b.count)).sum()
    }

    /// Sum of `count` across stringers
    pub fn stringer_count(&self) -> u64 {
        self.stringers.iter().map(|s| u64::from(s.count)).sum()
    }

    /// Every component in deck, lead, stringer order.
    pub fn components(&self) -> impl Iterator<Item = &dyn LumberComponent> + '_ {
        self.deck_boards
            .iter()
            .map(|b| b as &dyn LumberComponent)
            .chain(self.lead_boards.iter().map(|b| b as &dyn LumberComponent))
            .chain(self.stringers.iter().map(|s| s as &dyn LumberComponent))
    }

    /// The first lumber type chosen on any component.
    ///
    /// The single-curve calculator prices the whole pallet with this type.
    pub fn primary_lumber_type(&self) -> Option<&str> {
        self.components()
            .map(|c| c.lumber_type())
            .find(|t| !t.is_empty())
    }

    /// Drop the computed snapshot after an input edit.
    pub fn invalidate(&mut self) {
        self.results = None;
    }
}
