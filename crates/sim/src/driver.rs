//! 模拟驱动：每个个体一个线程，反复休息、进食

use core::fmt;
use std::thread;
use std::time::{Duration, Instant};

use catmouse::{CatMouse, InitError, Species};
use sync::Semaphore;

use crate::config::{ConfigError, SimConfig};
use crate::logging::{self, LogStats};
use crate::referee::Referee;

/// 一次模拟的结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimReport {
    /// 碗数
    pub bowls: usize,
    /// 猫完成的进食次数
    pub cat_meals: usize,
    /// 老鼠完成的进食次数
    pub mouse_meals: usize,
    /// 最多同时进食的猫
    pub max_cats_eating: usize,
    /// 最多同时进食的老鼠
    pub max_mice_eating: usize,
    /// 碗被同时占用的次数
    pub bowl_violations: usize,
    /// 两个物种同时进食的次数
    pub species_violations: usize,
    /// 地板移交次数
    pub handoffs: usize,
    /// 总耗时
    pub elapsed: Duration,
    /// 结束时排空 klog 缓冲区的统计
    pub log: LogStats,
}

impl SimReport {
    /// 没有任何违规
    pub fn is_clean(&self) -> bool {
        self.bowl_violations == 0 && self.species_violations == 0
    }
}

impl fmt::Display for SimReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "bowls:              {}", self.bowls)?;
        writeln!(
            f,
            "meals:              {} cat, {} mouse",
            self.cat_meals, self.mouse_meals
        )?;
        writeln!(
            f,
            "max concurrent:     {} cat, {} mouse",
            self.max_cats_eating, self.max_mice_eating
        )?;
        writeln!(f, "floor handoffs:     {}", self.handoffs)?;
        writeln!(
            f,
            "violations:         {} bowl, {} species",
            self.bowl_violations, self.species_violations
        )?;
        writeln!(
            f,
            "log entries:        {} buffered, {} dropped",
            self.log.entries, self.log.dropped
        )?;
        write!(f, "elapsed:            {:.3}s", self.elapsed.as_secs_f64())
    }
}

/// 模拟错误
#[derive(Debug)]
pub enum SimError {
    /// 参数无效
    Config(ConfigError),
    /// 引擎初始化失败
    Init(InitError),
    /// 无法创建个体线程
    Spawn(std::io::Error),
    /// 个体线程 panic，值为线程名
    CreaturePanicked(String),
}

impl fmt::Display for SimError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SimError::Config(e) => write!(f, "invalid configuration: {}", e),
            SimError::Init(e) => write!(f, "engine initialization failed: {}", e),
            SimError::Spawn(e) => write!(f, "failed to spawn creature thread: {}", e),
            SimError::CreaturePanicked(name) => write!(f, "creature {} panicked", name),
        }
    }
}

impl std::error::Error for SimError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SimError::Config(e) => Some(e),
            SimError::Init(e) => Some(e),
            SimError::Spawn(e) => Some(e),
            SimError::CreaturePanicked(_) => None,
        }
    }
}

impl From<ConfigError> for SimError {
    fn from(e: ConfigError) -> Self {
        SimError::Config(e)
    }
}

impl From<InitError> for SimError {
    fn from(e: InitError) -> Self {
        SimError::Init(e)
    }
}

struct Shared {
    engine: CatMouse,
    referee: Referee,
    done: Semaphore,
}

#[derive(Clone, Copy)]
struct Creature {
    species: Species,
    index: usize,
    eat: Duration,
    sleep: Duration,
}

/// 第 `index` 个个体在第 `round` 轮使用的碗（1 起编号）
pub fn bowl_for(index: usize, round: usize, bowls: usize) -> usize {
    (index + round) % bowls + 1
}

/// 个体线程退出时（包括 panic 展开）通知驱动
struct DoneGuard<'a>(&'a Semaphore);

impl Drop for DoneGuard<'_> {
    fn drop(&mut self) {
        self.0.up();
    }
}

fn creature_main(shared: &Shared, creature: Creature, rounds: usize) {
    let _done = DoneGuard(&shared.done);
    let bowls = shared.engine.bowl_count();
    for round in 0..rounds {
        thread::sleep(creature.sleep);
        let bowl = bowl_for(creature.index, round, bowls);
        shared.engine.enter(creature.species, bowl);
        shared.referee.start_meal(creature.species, bowl);
        thread::sleep(creature.eat);
        shared.referee.end_meal(creature.species, bowl);
        shared.engine.leave(creature.species, bowl);
    }
    log::debug!("{} {} finished {} rounds", creature.species, creature.index, rounds);
}

/// 运行一次模拟，等待所有个体结束后返回统计
pub fn run(config: &SimConfig) -> Result<SimReport, SimError> {
    config.validate()?;
    crate::sched::install();

    let shared = Shared {
        engine: CatMouse::initialize(config.bowls)?,
        referee: Referee::new(config.bowls),
        done: Semaphore::new(0),
    };
    log::info!(
        "sim: {} bowls, {} cats, {} mice, {} rounds",
        config.bowls,
        config.cats,
        config.mice,
        config.rounds
    );

    let cats = (0..config.cats).map(|index| Creature {
        species: Species::Cat,
        index,
        eat: config.cat_eat,
        sleep: config.cat_sleep,
    });
    let mice = (0..config.mice).map(|index| Creature {
        species: Species::Mouse,
        index,
        eat: config.mouse_eat,
        sleep: config.mouse_sleep,
    });

    let start = Instant::now();
    let (elapsed, spawn_error, panicked) = thread::scope(|scope| {
        let mut workers = Vec::with_capacity(config.creatures());
        let mut spawn_error = None;
        for creature in cats.chain(mice) {
            let name = format!("{}-{}", creature.species, creature.index);
            let shared = &shared;
            let result = thread::Builder::new()
                .name(name.clone())
                .spawn_scoped(scope, move || creature_main(shared, creature, config.rounds));
            match result {
                Ok(handle) => workers.push((name, handle)),
                Err(e) => {
                    spawn_error = Some(e);
                    break;
                }
            }
        }

        for _ in 0..workers.len() {
            shared.done.down();
        }
        let elapsed = start.elapsed();

        let mut panicked = None;
        for (name, handle) in workers {
            if handle.join().is_err() && panicked.is_none() {
                panicked = Some(name);
            }
        }
        (elapsed, spawn_error, panicked)
    });

    if let Some(e) = spawn_error {
        log::error!("sim: failed to spawn every creature: {}", e);
        return Err(SimError::Spawn(e));
    }
    if let Some(name) = panicked {
        log::error!("sim: creature {} panicked", name);
        return Err(SimError::CreaturePanicked(name));
    }

    let snapshot = shared.engine.snapshot();
    let referee = &shared.referee;
    let mut report = SimReport {
        bowls: config.bowls,
        cat_meals: referee.meals(Species::Cat),
        mouse_meals: referee.meals(Species::Mouse),
        max_cats_eating: referee.max_eating(Species::Cat),
        max_mice_eating: referee.max_eating(Species::Mouse),
        bowl_violations: referee.bowl_violations(),
        species_violations: referee.species_violations(),
        handoffs: snapshot.handoffs,
        elapsed,
        log: LogStats::default(),
    };
    shared.engine.shutdown();

    log::info!("sim: finished in {:?}", elapsed);
    report.log = logging::drain();
    Ok(report)
}
