//! Imperial to metric conversions for the analysis request.

const CM_PER_FOOT: f64 = 30.48;
const CM_PER_INCH: f64 = 2.54;
const LBS_PER_KG: f64 = 2.205;

pub fn feet_inches_to_cm(feet: u8, inches: u8) -> f64 {
    f64::from(feet) * CM_PER_FOOT + f64::from(inches) * CM_PER_INCH
}

pub fn lbs_to_kg(lbs: f64) -> f64 {
    lbs / LBS_PER_KG
}
