//! Binary masks from Landsat Collection 2 pixel quality bands.
//!
//! Bit layout of `qa_pixel`: 1 dilated cloud, 2 cirrus, 3 cloud,
//! 4 cloud shadow, 5 snow, 7 water.

use ndarray::{Array2, ArrayView2, Zip};
use num_traits::PrimInt;
use std::mem::size_of;

/// Cirrus, cloud, dilated cloud and snow flags.
pub const DEFAULT_CLOUD_CLASSES: [usize; 4] = [1, 2, 3, 5];

/// Bit flagging open water.
pub const WATER_BIT: usize = 7;

#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum QualityError {
    #[error("Bit range {start}..={end} is not within the {bits} bits of the QA band")]
    InvalidBitRange { start: usize, end: usize, bits: usize },
}

/// Value of the bits `start..=end` of every pixel, shifted down to bit 0.
///
/// `start` must not exceed `end` and `end` must be below the bit width of `T`.
pub fn mask_from_qa_bits<T: PrimInt>(
    qa: ArrayView2<T>,
    bit_range: (usize, usize),
) -> Result<Array2<T>, QualityError> {
    let (start, end) = bit_range;
    let bits = size_of::<T>() * 8;
    if start > end || end >= bits {
        return Err(QualityError::InvalidBitRange { start, end, bits });
    }
    let pattern = (start..=end).fold(T::zero(), |pattern, bit| pattern | (T::one() << bit));
    Ok(qa.mapv(|value| (value & pattern) >> start))
}

/// Pixels with any of the given single-bit classes set.
pub fn cloud_and_shadow_mask<T: PrimInt>(
    qa: ArrayView2<T>,
    classes: &[usize],
) -> Result<Array2<bool>, QualityError> {
    let mut mask = Array2::from_elem(qa.raw_dim(), false);
    for class in classes {
        let flagged = mask_from_qa_bits(qa, (*class, *class))?;
        Zip::from(&mut mask)
            .and(&flagged)
            .for_each(|masked, flag| *masked |= !flag.is_zero());
    }
    Ok(mask)
}

pub fn water_mask<T: PrimInt>(qa: ArrayView2<T>) -> Result<Array2<bool>, QualityError> {
    Ok(mask_from_qa_bits(qa, (WATER_BIT, WATER_BIT))?.mapv(|flag| !flag.is_zero()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;
    use rstest::rstest;

    #[test]
    fn extracts_bit_ranges() {
        let qa = array![[0b1010_1100u16, 0b0000_0011], [0xffff, 0]];
        assert_eq!(
            mask_from_qa_bits(qa.view(), (2, 3)).unwrap(),
            array![[0b11u16, 0b00], [0b11, 0]]
        );
        assert_eq!(
            mask_from_qa_bits(qa.view(), (0, 1)).unwrap(),
            array![[0u16, 0b11], [0b11, 0]]
        );
        assert_eq!(
            mask_from_qa_bits(qa.view(), (0, 15)).unwrap(),
            qa
        );
    }

    #[rstest]
    #[case((0, 8))]
    #[case((8, 8))]
    #[case((3, 2))]
    fn rejects_bits_outside_the_band(#[case] bit_range: (usize, usize)) {
        let qa = array![[0xffu8]];
        assert_eq!(
            mask_from_qa_bits(qa.view(), bit_range),
            Err(QualityError::InvalidBitRange {
                start: bit_range.0,
                end: bit_range.1,
                bits: 8
            })
        );
    }

    #[test]
    fn masks_clouds_and_shadows() {
        // clear land, cloud, cirrus, snow
        let qa = array![[21824u16, 22280], [1 << 2, 1 << 5]];
        assert_eq!(
            cloud_and_shadow_mask(qa.view(), &DEFAULT_CLOUD_CLASSES).unwrap(),
            array![[false, true], [true, true]]
        );
        assert_eq!(
            cloud_and_shadow_mask(qa.view(), &[]).unwrap(),
            array![[false, false], [false, false]]
        );
        assert!(cloud_and_shadow_mask(qa.view(), &[16]).is_err());
    }

    #[test]
    fn masks_water() {
        let qa = array![[21952u16, 21824]];
        assert_eq!(water_mask(qa.view()).unwrap(), array![[true, false]]);
        assert!(water_mask(array![[0u8]].view()).is_ok());
    }
}
