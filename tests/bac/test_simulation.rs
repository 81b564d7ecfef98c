//! Multi-model simulation through the public API
//!
//! Tests cover:
//! - Empty drinking histories
//! - Default model sets per sex
//! - Partial failure of unsupported models
//! - Sip expansion and trimming of the horizon

use approx::assert_relative_eq;
use bacflow::prelude::*;
use chrono::{DateTime, Duration, TimeZone, Utc};

fn evening() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 5, 1, 20, 0, 0).unwrap()
}

fn round_of_drinks() -> Vec<Drink> {
    vec![
        Drink::new("Lager", 0.5, 0.05, evening(), 20).unwrap(),
        Drink::new("Red wine", 0.15, 0.13, evening() + Duration::minutes(40), 10).unwrap(),
        Drink::new("Whisky", 0.04, 0.4, evening() + Duration::minutes(90), 1).unwrap(),
    ]
}

#[test]
fn test_empty_history_for_any_person() {
    let people = [
        Person::new(21, 1.60, 52.0, Sex::Female).unwrap(),
        Person::new(67, 1.92, 110.0, Sex::Male).unwrap(),
    ];
    for person in &people {
        let results = simulate(
            &[],
            person,
            evening(),
            evening() + Duration::hours(6),
            &SimulationOptions::default(),
            &[],
        )
        .unwrap();
        assert!(results.is_empty());
        assert!(results.successes().is_empty());
        assert!(results.errors().is_empty());
    }
}

#[test]
fn test_all_models_share_the_grid() {
    let person = Person::new(35, 1.80, 82.0, Sex::Male).unwrap();
    let end = evening() + Duration::hours(4);
    let results = simulate(
        &round_of_drinks(),
        &person,
        evening(),
        end,
        &SimulationOptions::default(),
        &[],
    )
    .unwrap();

    assert_eq!(results.len(), Model::ALL.len());
    let reference = results.series(Model::Widmark).unwrap();
    for series in results.successes() {
        assert_eq!(series.times(), reference.times());
        assert!(series.bac().iter().all(|&b| b >= 0.0));
        for (b, p) in series.bac().iter().zip(series.bac_perc()) {
            assert_eq!(*p, b * 100.0);
        }
    }
}

#[test]
fn test_body_factor_orders_peak_concentration() {
    // A smaller body factor concentrates the same alcohol more
    let person = Person::new(35, 1.80, 82.0, Sex::Male).unwrap();
    let end = evening() + Duration::hours(4);
    let results = simulate(
        &round_of_drinks(),
        &person,
        evening(),
        end,
        &SimulationOptions::default(),
        &[],
    )
    .unwrap();

    let peak = |model: Model| {
        results
            .series(model)
            .unwrap()
            .bac_excluding_elimination()
            .iter()
            .cloned()
            .fold(0.0, f64::max)
    };
    let r_seidl = person.body_factor(Model::Seidl).unwrap();
    let r_widmark = person.body_factor(Model::Widmark).unwrap();
    assert_relative_eq!(
        peak(Model::Seidl) * r_seidl,
        peak(Model::Widmark) * r_widmark,
        epsilon = 1e-12
    );
}

#[test]
fn test_female_ulrich_fails_alone() {
    let person = Person::new(29, 1.68, 61.0, Sex::Female).unwrap();
    let options = SimulationOptions::default().with_models(Model::ALL.to_vec());
    let results = simulate(
        &round_of_drinks(),
        &person,
        evening(),
        evening() + Duration::hours(3),
        &options,
        &[],
    )
    .unwrap();

    assert_eq!(results.len(), 6);
    assert_eq!(results.successes().len(), 5);
    let errors = results.errors();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].0, Model::Ulrich);
    assert!(matches!(
        errors[0].1,
        BacError::UnsupportedModel {
            model: Model::Ulrich,
            sex: Sex::Female
        }
    ));
    assert!(results.aggregate().is_ok());
}

#[test]
fn test_sips_conserve_alcohol() {
    for drink in round_of_drinks() {
        let sips = drink.split_into_sips();
        assert_eq!(sips.len(), drink.sip_interval() as usize);
        let total: f64 = sips.iter().map(Drink::alcohol_kg).sum();
        assert_relative_eq!(total, drink.alcohol_kg(), epsilon = 1e-12);
    }
}

#[test]
fn test_absorbed_mass_is_conserved_with_sips() {
    // After a day every drink is fully absorbed whether or not it is sipped
    let person = Person::new(35, 1.80, 82.0, Sex::Male).unwrap();
    let end = evening() + Duration::hours(24);
    let whole = SimulationOptions::default().with_models(vec![Model::Watson]);
    let sipped = whole.clone().with_split_sips(true);

    let a = simulate(&round_of_drinks(), &person, evening(), end, &whole, &[]).unwrap();
    let b = simulate(&round_of_drinks(), &person, evening(), end, &sipped, &[]).unwrap();
    let a = a.series(Model::Watson).unwrap().bac_excluding_elimination();
    let b = b.series(Model::Watson).unwrap().bac_excluding_elimination();
    assert_relative_eq!(a[a.len() - 1], b[b.len() - 1], epsilon = 1e-12);
}

#[test]
fn test_meals_lower_the_curve() {
    let person = Person::new(35, 1.80, 82.0, Sex::Male).unwrap();
    let end = evening() + Duration::hours(3);
    let options = SimulationOptions::default().with_models(vec![Model::Forrest]);
    let dinner = [Food::new("Steak", evening() - Duration::minutes(30), FoodCategory::Heavy)];

    let fasting = simulate(&round_of_drinks(), &person, evening(), end, &options, &[]).unwrap();
    let fed = simulate(&round_of_drinks(), &person, evening(), end, &options, &dinner).unwrap();
    let fasting = fasting.series(Model::Forrest).unwrap();
    let fed = fed.series(Model::Forrest).unwrap();
    for i in 1..fed.len() {
        assert!(fed.bac_excluding_elimination()[i] <= fasting.bac_excluding_elimination()[i]);
    }
}

#[test]
fn test_trimmed_horizon_is_a_prefix() {
    let person = Person::new(35, 1.80, 82.0, Sex::Male).unwrap();
    let end = evening() + Duration::hours(10);
    let fixed = SimulationOptions::default().with_split_sips(true);
    let trimmed = fixed.clone().with_horizon(Horizon::TrimWhenSober);

    let full = simulate(&round_of_drinks(), &person, evening(), end, &fixed, &[]).unwrap();
    let short = simulate(&round_of_drinks(), &person, evening(), end, &trimmed, &[]).unwrap();

    for series in short.successes() {
        let reference = full.series(series.model()).unwrap();
        assert!(series.len() <= reference.len());
        assert!(series.len() > 90, "trimming never cuts before the last drink");
        assert_eq!(series.times(), &reference.times()[..series.len()]);
    }
}
