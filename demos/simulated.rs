//! Scale on a simulated load cell
//!
//! `RUST_LOG=trace cargo run --example simulated`

use std::cell::Cell;
use std::rc::Rc;

use hx711_scale::{
    AdcReader, Channel, LoadCell, Mass, ReadType, ScaleConfig, SimpleHx711, TimeoutError, Unit,
    DEFAULT_TIMES,
};

/// Raw counts for the platform plus whatever sits on it, with some noise.
struct SimulatedCell {
    zero: i32,
    counts_per_gram: i32,
    load_grams: Rc<Cell<i32>>,
    tick: i32,
}

impl AdcReader for SimulatedCell {
    fn get_value(&mut self, _channel: Channel) -> Result<i32, TimeoutError> {
        self.tick = self.tick.wrapping_add(1);
        let noise = (self.tick * 7919) % 41 - 20;
        Ok(self.zero + self.counts_per_gram * self.load_grams.get() + noise)
    }
}

fn main() -> Result<(), hx711_scale::Error> {
    env_logger::init();

    let load = Rc::new(Cell::new(0));
    let cell = SimulatedCell {
        zero: 84_210,
        counts_per_gram: 420,
        load_grams: load.clone(),
        tick: 0,
    };
    let config = ScaleConfig::default().with_reference_unit(420);
    let mut scale = SimpleHx711::with_config(cell, config);

    // zero the readings
    scale.tare(ReadType::Median, 15)?;
    println!("offset = {}", scale.get_offset());
    println!("noise = {:.3} g", scale.noise(15)?);

    load.set(2750);
    for read_type in [ReadType::Median, ReadType::Average] {
        let weight = scale.weight(read_type, DEFAULT_TIMES)?;
        println!("{read_type:?}: {weight} = {}", weight.to_string_in(Unit::Lb));
    }

    scale.set_unit(Unit::Kg);
    let weight = scale.weight(ReadType::Median, 9)?;
    let cup = Mass::new(250.0, Unit::G);
    println!("{weight} is {:.1} cups", (weight / cup)?.grams());

    Ok(())
}
