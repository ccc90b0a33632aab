use sceneshift_serde::{BitReader, BitWrite, Serde, SerdeErr, SignedFloat, SignedVariableFloat};

/// Position components keep centimeter precision up to [`POSITION_LIMIT`]
pub type PositionComponent = SignedVariableFloat<14, 2>;
/// Largest position magnitude the wire can carry, larger values are clamped
pub const POSITION_LIMIT: f32 = i128::MAX as f32 / 100.0;
/// Unit quaternion components, clamped to [-1, 1] and kept to 3 decimals
pub type RotationComponent = SignedFloat<10, 3>;

#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct Position {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Position {
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }
}

/// Orientation as a quaternion
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rotation {
    pub x: f32,
    pub y: f32,
    pub z: f32,
    pub w: f32,
}

impl Rotation {
    pub const IDENTITY: Self = Self::new(0.0, 0.0, 0.0, 1.0);

    pub const fn new(x: f32, y: f32, z: f32, w: f32) -> Self {
        Self { x, y, z, w }
    }
}

impl Default for Rotation {
    fn default() -> Self {
        Self::IDENTITY
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct Transform {
    pub position: Position,
    pub rotation: Rotation,
}

impl Transform {
    pub const fn new(position: Position, rotation: Rotation) -> Self {
        Self { position, rotation }
    }
}

impl Serde for Transform {
    fn ser(&self, writer: &mut dyn BitWrite) {
        let Position { x, y, z } = self.position;
        for component in [x, y, z] {
            PositionComponent::new(finite_within(component, POSITION_LIMIT)).ser(writer);
        }

        let Rotation { x, y, z, w } = self.rotation;
        for component in [x, y, z, w] {
            RotationComponent::new(finite_within(component, 1.0)).ser(writer);
        }
    }

    fn de(reader: &mut BitReader) -> Result<Self, SerdeErr> {
        let x = PositionComponent::de(reader)?.get();
        let y = PositionComponent::de(reader)?.get();
        let z = PositionComponent::de(reader)?.get();

        let qx = RotationComponent::de(reader)?.get();
        let qy = RotationComponent::de(reader)?.get();
        let qz = RotationComponent::de(reader)?.get();
        let qw = RotationComponent::de(reader)?.get();

        Ok(Self::new(Position::new(x, y, z), Rotation::new(qx, qy, qz, qw)))
    }
}

fn finite_within(value: f32, limit: f32) -> f32 {
    if value.is_finite() {
        value.clamp(-limit, limit)
    } else {
        0.0
    }
}
