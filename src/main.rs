//! Hoop Shot headless runner
//!
//! Plays a timed run with a seeded shooter bot and prints the final snapshot
//! as JSON. Usage: `hoop-shot [config.json] [seed]`.

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use hoop_shot::consts::SIM_DT;
    use hoop_shot::events::LogSink;
    use hoop_shot::sim::ModeKind;
    use hoop_shot::{Config, GameEvent, Session};
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    env_logger::init();
    log::info!("Hoop Shot (headless) starting...");

    let mut args = std::env::args().skip(1);
    let config = match args.next() {
        Some(path) => Config::load_or_default(path),
        None => Config::default(),
    };
    let seed = args.next().and_then(|s| s.parse().ok()).unwrap_or(0x5eed);
    log::info!("Bot seed {seed}");

    let mut session = Session::new(config);
    session.add_sink(LogSink);
    session.add_sink(|event: &GameEvent| {
        if let GameEvent::ShotResolved {
            success,
            points,
            is_swish,
            combo_bonus,
        } = event
        {
            let verdict = match (*success, *is_swish) {
                (true, true) => "SWISH",
                (true, false) => "GOOD",
                _ => "MISS",
            };
            println!("{verdict:>5} +{points} (combo bonus {combo_bonus})");
        }
    });

    session.set_game_mode(ModeKind::Timed);
    let mut bot = bot::ShooterBot::new(Pcg32::seed_from_u64(seed));

    // Run until the timed run ends (plus the game-over screen)
    let frames = ((session.config().rules.timed_duration + 1.0) / SIM_DT) as u32;
    let mut snapshot = session.update(SIM_DT);
    for _ in 0..frames {
        bot.act(&mut session, &snapshot);
        snapshot = session.update(SIM_DT);
    }

    match serde_json::to_string_pretty(&snapshot) {
        Ok(json) => println!("{json}"),
        Err(err) => log::error!("Failed to serialise snapshot: {err}"),
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // The library is driven by the host page; nothing to run here
}

#[cfg(not(target_arch = "wasm32"))]
mod bot {
    use hoop_shot::Session;
    use hoop_shot::sim::{Direction, Hoop, HoopSide, Snapshot};
    use rand::Rng;
    use rand_pcg::Pcg32;

    /// Walks the ball to a random spot in front of a hoop and shoots
    pub struct ShooterBot {
        rng: Pcg32,
        plan: Option<Plan>,
    }

    struct Plan {
        spot_x: f32,
        power: u8,
    }

    impl ShooterBot {
        pub fn new(rng: Pcg32) -> Self {
            Self { rng, plan: None }
        }

        pub fn act(&mut self, session: &mut Session, snapshot: &Snapshot) {
            if snapshot.is_in_flight || snapshot.next_shot_in > 0.0 {
                self.plan = None;
                return;
            }

            let plan = match self.plan.take() {
                Some(plan) => plan,
                None => {
                    let side = if self.rng.random_bool(0.5) {
                        HoopSide::Left
                    } else {
                        HoopSide::Right
                    };
                    let hoop = Hoop::new(side, &session.config().court);
                    let distance = self.rng.random_range(3.5f32..7.0);
                    let power = 5 * self.rng.random_range(10u8..=14);
                    log::debug!(
                        "Bot plans a {:.1}m shot at the {} hoop, power {power}",
                        distance,
                        side.as_str()
                    );
                    Plan {
                        spot_x: hoop.rim_center.x - side.sign() * distance,
                        power,
                    }
                }
            };

            let x = snapshot.ball_position.x;
            let z = snapshot.ball_position.z;
            if (x - plan.spot_x).abs() > 0.3 {
                let dir = if plan.spot_x < x { Direction::Left } else { Direction::Right };
                session.move_ball(dir);
            } else if z.abs() > 0.3 {
                let dir = if z > 0.0 { Direction::Forward } else { Direction::Backward };
                session.move_ball(dir);
            } else if snapshot.shot_power != plan.power {
                session.adjust_power(plan.power > snapshot.shot_power);
            } else {
                session.shoot();
                return;
            }
            self.plan = Some(plan);
        }
    }
}
