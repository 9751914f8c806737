//! The fixed level table.

use std::fmt;

use finder_engine::coords::Vec2;

use crate::config::{LEVEL_COUNT, TARGETS_PER_LEVEL};

/// Escape-time fractal a level is drawn with.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Kernel {
    Mandelbrot,
    Tricorn,
    BurningShip,
    /// Julia set for c = -0.8 + 0.156i.
    Julia0,
    /// Julia set for c = 0.285 + 0.01i.
    Julia1,
    /// Julia set for c = -0.4 + 0.6i.
    Julia2,
}

impl Kernel {
    pub const ALL: [Kernel; 6] = [
        Kernel::Mandelbrot,
        Kernel::Tricorn,
        Kernel::BurningShip,
        Kernel::Julia0,
        Kernel::Julia1,
        Kernel::Julia2,
    ];

    /// Resource alias of the kernel's compute source.
    pub fn alias(self) -> &'static str {
        match self {
            Kernel::Mandelbrot => "mandelbrot",
            Kernel::Tricorn => "tricorn",
            Kernel::BurningShip => "burning",
            Kernel::Julia0 => "julia0",
            Kernel::Julia1 => "julia1",
            Kernel::Julia2 => "julia2",
        }
    }

    /// File name of the compute source inside the resource directory.
    pub fn file_name(self) -> String {
        format!("{}.wgsl", self.alias())
    }

    /// Position in `Kernel::ALL`.
    pub fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Kernel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.alias())
    }
}

/// A hidden region: found by clicking within `half_width / 2` of `center`.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Target {
    pub center: Vec2,
    /// Half-extent of the preview; also the preview's zoom.
    pub half_width: f32,
}

impl Target {
    pub const fn new(x: f32, y: f32, half_width: f32) -> Self {
        Self {
            center: Vec2::new(x, y),
            half_width,
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct LevelDescriptor {
    pub kernel: Kernel,
    pub targets: [Target; TARGETS_PER_LEVEL],
}

#[derive(thiserror::Error, Debug, PartialEq)]
pub enum LevelTableError {
    #[error("level table is empty")]
    Empty,

    #[error("level {level} target {target}: half width {value} must be finite and > 0")]
    BadHalfWidth { level: usize, target: usize, value: f32 },

    #[error("level {level} target {target}: center is not finite")]
    NonFiniteCenter { level: usize, target: usize },
}

/// Ordered, validated, immutable list of levels.
#[derive(Debug, Clone)]
pub struct LevelTable {
    levels: Vec<LevelDescriptor>,
}

impl LevelTable {
    pub fn new(levels: Vec<LevelDescriptor>) -> Result<Self, LevelTableError> {
        if levels.is_empty() {
            return Err(LevelTableError::Empty);
        }

        for (level, desc) in levels.iter().enumerate() {
            for (target, t) in desc.targets.iter().enumerate() {
                if !(t.half_width.is_finite() && t.half_width > 0.0) {
                    return Err(LevelTableError::BadHalfWidth {
                        level,
                        target,
                        value: t.half_width,
                    });
                }
                if !t.center.is_finite() {
                    return Err(LevelTableError::NonFiniteCenter { level, target });
                }
            }
        }

        Ok(Self { levels })
    }

    /// The twelve hand-authored levels of the game.
    pub fn authored() -> Result<Self, LevelTableError> {
        Self::new(AUTHORED.to_vec())
    }

    pub fn len(&self) -> usize {
        self.levels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&LevelDescriptor> {
        self.levels.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &LevelDescriptor> {
        self.levels.iter()
    }
}

impl std::ops::Index<usize> for LevelTable {
    type Output = LevelDescriptor;

    fn index(&self, index: usize) -> &LevelDescriptor {
        &self.levels[index]
    }
}

const fn level(kernel: Kernel, targets: [Target; TARGETS_PER_LEVEL]) -> LevelDescriptor {
    LevelDescriptor { kernel, targets }
}

#[rustfmt::skip]
const AUTHORED: [LevelDescriptor; LEVEL_COUNT] = [
    level(Kernel::Mandelbrot, [
        Target::new(-0.56226, -0.642735, 0.00539102),
        Target::new(-0.1283, -0.988242, 0.00485192),
        Target::new(-0.0584823, 0.660361, 0.0556257),
        Target::new(-0.862101, -0.258372, 0.0215505),
    ]),
    level(Kernel::Tricorn, [
        Target::new(0.743174, -0.930051, 0.00676278),
        Target::new(-1.47725, 0.0, 0.00927678),
        Target::new(-1.20453, -0.079302, 0.00547786),
        Target::new(0.228252, -0.529966, 0.0500631),
    ]),
    level(Kernel::BurningShip, [
        Target::new(0.970566, -1.68122, 0.00154711),
        Target::new(-1.57553, -0.0369697, 0.000739977),
        Target::new(-1.86087, -0.000532295, 0.00212224),
        Target::new(-0.969854, -0.989513, 0.0114528),
    ]),
    level(Kernel::Julia1, [
        Target::new(0.523753, -0.188956, 0.14358),
        Target::new(-0.509669, -0.0752877, 0.0556257),
        Target::new(-0.075375, 0.584517, 0.0405511),
        Target::new(0.225403, 1.02556, 0.0405511),
    ]),
    level(Kernel::Julia2, [
        Target::new(0.744528, -0.276319, 0.19222),
        Target::new(-1.08141, -0.45105, 0.0405511),
        Target::new(0.282748, 0.680276, 0.0157103),
        Target::new(-0.689748, -0.255823, 0.0618063),
    ]),
    level(Kernel::Julia0, [
        Target::new(-0.551516, 0.108391, 0.0295617),
        Target::new(0.907088, -0.284514, 0.076304),
        Target::new(-0.0433468, 0.818537, 0.0399335),
        Target::new(0.0308237, -0.0408021, 0.0215505),
    ]),
    level(Kernel::Mandelbrot, [
        Target::new(0.3187, -0.0321924, 0.00834911),
        Target::new(-1.76648, -0.0417347, 0.000485498),
        Target::new(-1.02001, 0.367522, 0.000232213),
        Target::new(-0.398024, -0.681524, 0.00323461),
    ]),
    level(Kernel::Tricorn, [
        Target::new(0.409404, -1.1384, 0.000111066),
        Target::new(-1.25785, -0.0921809, 0.00547789),
        Target::new(0.596074, 1.10252, 0.00202005),
        Target::new(0.767101, -1.31569, 0.00013712),
    ]),
    level(Kernel::BurningShip, [
        Target::new(0.480201, -1.14648, 0.0127253),
        Target::new(0.375798, 0.0866547, 0.000665978),
        Target::new(-1.76489, -0.0300707, 0.000599382),
        Target::new(-1.56364, -0.000174844, 0.000393255),
    ]),
    level(Kernel::Julia1, [
        Target::new(0.231377, 0.587359, 0.0157103),
        Target::new(-0.486454, 1.0161, 0.00323462),
        Target::new(-0.50049, -0.750328, 0.00608653),
        Target::new(-0.132677, -0.069827, 0.0141394),
    ]),
    level(Kernel::Julia2, [
        Target::new(-1.25244, -0.567376, 0.00154711),
        Target::new(0.558084, 0.580386, 0.00927678),
        Target::new(0.950295, -0.322775, 0.000739975),
        Target::new(-1.02154, 0.270105, 0.00191001),
    ]),
    level(Kernel::Julia0, [
        Target::new(-0.325299, 0.554382, 0.0618063),
        Target::new(0.375164, -0.363071, 0.0405511),
        Target::new(-1.54658, 0.11131, 0.00154712),
        Target::new(-1.4419, 0.149601, 0.0060865),
    ]),
];
