//! Device maintenance scheduling.
//!
//! Every `Device` needs a timeslot, a technician holding its required skill
//! and a workstation supporting its device type. Technicians and
//! workstations handle one device per timeslot.

use plansmith_core::{
    Entity, EntityClassDef, EntityView, Fact, FactClassDef, FactRef, FieldDef, HardSoftScore,
    Solution, SolutionDescriptor, Value, ValueRangeDef,
};
use plansmith_scoring::{group_key, Collector, Constraint, ConstraintSet};

/// Fact class indices.
pub const TECHNICIAN: usize = 0;
pub const WORKSTATION: usize = 1;
pub const TIMESLOT: usize = 2;
/// Entity class index.
pub const DEVICE: usize = 0;

/// `Technician` fields.
pub const TECHNICIAN_NAME: usize = 1;
pub const SKILLS: usize = 2;

/// `Workstation` fields.
pub const WORKSTATION_NAME: usize = 1;
pub const SUPPORTED_DEVICE_TYPES: usize = 2;

/// `Timeslot` fields.
pub const DAY_OF_WEEK: usize = 1;
pub const START_MINUTE: usize = 2;
pub const END_MINUTE: usize = 3;

/// `Device` fields.
pub const ID: usize = 0;
pub const NAME: usize = 1;
pub const DEVICE_TYPE: usize = 2;
pub const REQUIRED_SKILL: usize = 3;
pub const SERIAL_NUMBER: usize = 4;
pub const TIMESLOT_VAR: usize = 5;
pub const TECHNICIAN_VAR: usize = 6;
pub const WORKSTATION_VAR: usize = 7;

pub const DAYS: [&str; 5] = ["MONDAY", "TUESDAY", "WEDNESDAY", "THURSDAY", "FRIDAY"];
/// First and last starting hour of a working day.
pub const FIRST_HOUR: i64 = 7;
pub const LAST_HOUR: i64 = 14;

/// Constraint weights; every constraint is hard except load balance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScheduleWeights {
    pub technician_skill: HardSoftScore,
    pub workstation_type: HardSoftScore,
    pub technician_conflict: HardSoftScore,
    pub workstation_conflict: HardSoftScore,
    pub unassigned: HardSoftScore,
    pub load_balance: HardSoftScore,
}

impl Default for ScheduleWeights {
    fn default() -> Self {
        Self {
            technician_skill: HardSoftScore::ONE_HARD,
            workstation_type: HardSoftScore::ONE_HARD,
            technician_conflict: HardSoftScore::ONE_HARD,
            workstation_conflict: HardSoftScore::ONE_HARD,
            unassigned: HardSoftScore::ONE_HARD,
            load_balance: HardSoftScore::ONE_SOFT,
        }
    }
}

pub fn descriptor() -> SolutionDescriptor {
    SolutionDescriptor::new("DeviceSchedule")
        .with_fact_class(
            FactClassDef::new("Technician")
                .with_field(FieldDef::planning_id("id"))
                .with_field(FieldDef::new("name"))
                .with_field(FieldDef::new("skills")),
        )
        .with_fact_class(
            FactClassDef::new("Workstation")
                .with_field(FieldDef::planning_id("id"))
                .with_field(FieldDef::new("name"))
                .with_field(FieldDef::new("supported_device_types")),
        )
        .with_fact_class(
            FactClassDef::new("Timeslot")
                .with_field(FieldDef::planning_id("id"))
                .with_field(FieldDef::new("day_of_week"))
                .with_field(FieldDef::new("start_minute"))
                .with_field(FieldDef::new("end_minute")),
        )
        .with_entity_class(
            EntityClassDef::new("Device")
                .with_field(FieldDef::planning_id("id"))
                .with_field(FieldDef::new("name"))
                .with_field(FieldDef::new("device_type"))
                .with_field(FieldDef::new("required_skill"))
                .with_field(FieldDef::new("serial_number"))
                .with_field(FieldDef::planning_variable("timeslot", "timeslotRange"))
                .with_field(FieldDef::planning_variable("technician", "technicianRange"))
                .with_field(FieldDef::planning_variable("workstation", "workstationRange")),
        )
        .with_value_range("timeslotRange", ValueRangeDef::FactClass("Timeslot".into()))
        .with_value_range("technicianRange", ValueRangeDef::FactClass("Technician".into()))
        .with_value_range("workstationRange", ValueRangeDef::FactClass("Workstation".into()))
}

fn strings(items: &[&str]) -> Value {
    Value::set(items.iter().map(|s| Value::str(s)))
}

pub fn add_technician(solution: &mut Solution, id: i64, name: &str, skills: &[&str]) -> FactRef {
    solution.add_fact(
        TECHNICIAN,
        Fact::new(vec![Value::Int(id), Value::str(name), strings(skills)]),
    )
}

pub fn add_workstation(solution: &mut Solution, id: i64, name: &str, types: &[&str]) -> FactRef {
    solution.add_fact(
        WORKSTATION,
        Fact::new(vec![Value::Int(id), Value::str(name), strings(types)]),
    )
}

/// Adds an unassigned device.
pub fn add_device(
    solution: &mut Solution,
    id: i64,
    device_type: &str,
    required_skill: &str,
) -> usize {
    solution.add_entity(
        DEVICE,
        Entity::new(vec![
            Value::Int(id),
            Value::str(&format!("Device {}", id)),
            Value::str(device_type),
            Value::str(required_skill),
            Value::str(&format!("SN{}", id)),
            Value::None,
            Value::None,
            Value::None,
        ]),
    )
}

/// Builds the 40 hourly timeslots, 3 technicians, 3 workstations and
/// 10 unassigned devices.
pub fn generate_problem() -> Solution {
    let mut solution = Solution::new(descriptor());

    let mut id = 1;
    for day in DAYS {
        for hour in FIRST_HOUR..=LAST_HOUR {
            let start = hour * 60;
            solution.add_fact(
                TIMESLOT,
                Fact::new(vec![
                    Value::Int(id),
                    Value::str(day),
                    Value::Int(start),
                    Value::Int(start + 60),
                ]),
            );
            id += 1;
        }
    }

    add_technician(&mut solution, 1, "John", &["skill1", "skill2"]);
    add_technician(&mut solution, 2, "Doe", &["skill1"]);
    add_technician(&mut solution, 3, "Smith", &["skill1", "skill2"]);

    add_workstation(&mut solution, 1, "WS1", &["type1"]);
    add_workstation(&mut solution, 2, "WS2", &["type2"]);
    add_workstation(&mut solution, 3, "WS3", &["type1", "type2"]);

    for device in 1..=10 {
        let (device_type, skill) = if matches!(device, 1 | 2 | 5 | 6 | 9) {
            ("type1", "skill1")
        } else {
            ("type2", "skill2")
        };
        add_device(&mut solution, device, device_type, skill);
    }
    solution
}

/// True when the device's technician holds the required skill.
pub fn has_required_skill(device: &EntityView<'_>) -> bool {
    device
        .fact(TECHNICIAN_VAR)
        .is_some_and(|t| t.get(SKILLS).set_contains(device.get(REQUIRED_SKILL)))
}

/// True when the device's workstation supports its type.
pub fn workstation_supports_type(device: &EntityView<'_>) -> bool {
    device
        .fact(WORKSTATION_VAR)
        .is_some_and(|w| w.get(SUPPORTED_DEVICE_TYPES).set_contains(device.get(DEVICE_TYPE)))
}

fn unassigned_count(device: &EntityView<'_>) -> i64 {
    [TIMESLOT_VAR, TECHNICIAN_VAR, WORKSTATION_VAR]
        .iter()
        .filter(|&&field| device.get(field).is_none())
        .count() as i64
}

fn pairs(count: i64) -> i64 {
    count * (count - 1) / 2
}

pub fn constraints() -> ConstraintSet {
    constraints_with(ScheduleWeights::default())
}

pub fn constraints_with(weights: ScheduleWeights) -> ConstraintSet {
    ConstraintSet::new()
        .with(
            Constraint::for_each("Device")
                .filter(|d| !d.get(TECHNICIAN_VAR).is_none())
                .filter(|d| !has_required_skill(d))
                .penalize("Technician skill", weights.technician_skill),
        )
        .with(
            Constraint::for_each("Device")
                .filter(|d| !d.get(WORKSTATION_VAR).is_none())
                .filter(|d| !workstation_supports_type(d))
                .penalize("Workstation device type", weights.workstation_type),
        )
        .with(
            Constraint::for_each("Device")
                .filter(|d| !d.get(TIMESLOT_VAR).is_none() && !d.get(TECHNICIAN_VAR).is_none())
                .group_by(
                    |d| group_key![d.get(TIMESLOT_VAR).clone(), d.get(TECHNICIAN_VAR).clone()],
                    Collector::count(),
                )
                .having(|g| g.count > 1)
                .penalize_with("Technician conflict", weights.technician_conflict, |g| {
                    pairs(g.count)
                }),
        )
        .with(
            Constraint::for_each("Device")
                .filter(|d| !d.get(TIMESLOT_VAR).is_none() && !d.get(WORKSTATION_VAR).is_none())
                .group_by(
                    |d| group_key![d.get(TIMESLOT_VAR).clone(), d.get(WORKSTATION_VAR).clone()],
                    Collector::count(),
                )
                .having(|g| g.count > 1)
                .penalize_with("Workstation conflict", weights.workstation_conflict, |g| {
                    pairs(g.count)
                }),
        )
        .with(
            Constraint::for_each("Device")
                .filter(|d| unassigned_count(d) > 0)
                .penalize_with("Unassigned variable", weights.unassigned, unassigned_count),
        )
        .with(
            Constraint::for_each("Device")
                .filter(|d| !d.get(TECHNICIAN_VAR).is_none())
                .group_by(|d| group_key![d.get(TECHNICIAN_VAR).clone()], Collector::count())
                .penalize_with("Technician load balance", weights.load_balance, |g| {
                    g.count * g.count
                }),
        )
}
