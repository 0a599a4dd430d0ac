use fleetwatch_model::prelude::*;

#[test]
fn blank_coordinates_mean_no_location() {
    let form =
        DriverForm::from_inputs("Ali", "+966500000000", "Van", "busy", "", " ")
            .unwrap();
    assert_eq!(form.location, None);
    assert_eq!(form.status, DriverStatus::Busy);
}

#[test]
fn numeric_coordinates_are_parsed() {
    let form = DriverForm::from_inputs("Ali", "", "", "", "24.7", "46.6")
        .unwrap();
    assert_eq!(form.location, Some(Location::new(24.7, 46.6)));
    assert_eq!(form.status, DriverStatus::Available);
}

#[test]
fn non_numeric_coordinate_is_rejected() {
    let err = DriverForm::from_inputs("Ali", "", "", "", "north", "46.6")
        .unwrap_err();
    assert_eq!(
        err,
        ModelError::InvalidCoordinate {
            field: "lat",
            raw: "north".into()
        }
    );
}

#[test]
fn half_filled_location_is_rejected() {
    let err =
        DriverForm::from_inputs("Ali", "", "", "", "24.7", "").unwrap_err();
    assert_eq!(err, ModelError::EmptyField("lng"));
}

#[test]
fn name_is_required() {
    let err = DriverForm::from_inputs("  ", "", "", "", "", "").unwrap_err();
    assert_eq!(err, ModelError::EmptyField("name"));
}

#[test]
fn phone_numbers_are_normalized() {
    assert_eq!(
        PhoneNumber::parse("966 50-123-4567").unwrap().as_str(),
        "+966501234567"
    );
    assert_eq!(PhoneNumber::parse("+15550100").unwrap().as_str(), "+15550100");
    assert!(PhoneNumber::parse("+").is_err());
    assert!(PhoneNumber::parse("call me").is_err());
}
