use num_traits::{One, PrimInt};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Trait implemented by layer enums that map onto a single bit.
///
/// The enum's discriminant (via `#[repr(u8)]`) typically determines the bit index.
pub trait LayerBit {
    type Storage: PrimInt;

    fn bit_index(&self) -> u8;

    fn mask(&self) -> Self::Storage {
        // NOTE: `bit_index()` must be < number of bits in `Storage`.
        Self::Storage::one() << (self.bit_index() as usize)
    }
}

/// Collision layers known to the controller.
///
/// Hosts are free to use the remaining bits of a [`CollisionMask`] for their
/// own layers via [`LayerMask::from_bits`].
#[repr(u8)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Layer {
    Terrain = 0,
    Platform = 1,
    Player = 2,
    Passenger = 3,
    Hazard = 4,
}

impl LayerBit for Layer {
    type Storage = u32;

    fn bit_index(&self) -> u8 {
        *self as u8
    }
}

/// A set of layers, used both as "what am I" and "what do I collide with".
#[derive(Default, Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct LayerMask<T: PrimInt> {
    pub bits: T,
}

/// The mask type passed to every line-cast.
pub type CollisionMask = LayerMask<u32>;

impl<T: PrimInt> LayerMask<T> {
    pub fn from_bits(bits: T) -> Self {
        Self { bits }
    }

    pub fn empty() -> Self {
        Self { bits: T::zero() }
    }

    pub fn all() -> Self {
        Self { bits: !T::zero() }
    }

    /// Builder-style [`LayerMask::add`].
    pub fn with<U: LayerBit<Storage = T>>(mut self, layer: U) -> Self {
        self.add(layer);
        self
    }

    pub fn add<U: LayerBit<Storage = T>>(&mut self, layer: U) {
        self.bits = self.bits | layer.mask();
    }

    pub fn remove<U: LayerBit<Storage = T>>(&mut self, layer: U) {
        self.bits = self.bits & !layer.mask();
    }

    pub fn has<U: LayerBit<Storage = T>>(&self, layer: U) -> bool {
        (self.bits & layer.mask()) != T::zero()
    }

    /// True when the two masks share at least one layer.
    pub fn intersects(&self, other: Self) -> bool {
        (self.bits & other.bits) != T::zero()
    }

    pub fn is_empty(&self) -> bool {
        self.bits == T::zero()
    }
}

impl<T: PrimInt, U: LayerBit<Storage = T>> FromIterator<U> for LayerMask<T> {
    fn from_iter<I: IntoIterator<Item = U>>(iter: I) -> Self {
        iter.into_iter().fold(Self::empty(), |mask, layer| mask.with(layer))
    }
}

impl From<Layer> for CollisionMask {
    fn from(layer: Layer) -> Self {
        Self::empty().with(layer)
    }
}

/// Scene files may spell a mask either as raw bits or as a list of layer names.
#[derive(Deserialize)]
#[serde(untagged)]
enum MaskRepr {
    Bits(u32),
    Layers(Vec<Layer>),
}

impl Serialize for CollisionMask {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.bits.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for CollisionMask {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(match MaskRepr::deserialize(deserializer)? {
            MaskRepr::Bits(bits) => Self::from_bits(bits),
            MaskRepr::Layers(layers) => layers.into_iter().collect(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layers_map_to_distinct_bits() {
        assert_eq!(Layer::Terrain.mask(), 0b0001);
        assert_eq!(Layer::Platform.mask(), 0b0010);
        assert_eq!(Layer::Player.mask(), 0b0100);
    }

    #[test]
    fn add_remove_and_query() {
        let mut mask = CollisionMask::empty();
        assert!(mask.is_empty());

        mask.add(Layer::Terrain);
        mask.add(Layer::Platform);
        assert!(mask.has(Layer::Terrain));
        assert!(mask.has(Layer::Platform));
        assert!(!mask.has(Layer::Player));

        mask.remove(Layer::Terrain);
        assert!(!mask.has(Layer::Terrain));
        assert!(mask.intersects(Layer::Platform.into()));
    }

    #[test]
    fn deserializes_from_bits_or_names() {
        let from_bits: CollisionMask = serde_json::from_str("3").unwrap();
        let from_names: CollisionMask = serde_json::from_str(r#"["terrain", "platform"]"#).unwrap();
        assert_eq!(from_bits, from_names);
        assert_eq!(serde_json::to_string(&from_names).unwrap(), "3");
    }
}
