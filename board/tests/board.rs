use bug_duel_board::{self as board, query, Board};
use bug_duel_core::{Command, Direction, Event, GridPoint, MatrixDimensions};

const DIMS: MatrixDimensions = MatrixDimensions::STANDARD;
const CAPACITY: u8 = 9;
const START: GridPoint = GridPoint::new(2, 3);

fn generate(board: &mut Board, bugs: u8) -> Vec<Event> {
    let mut events = Vec::new();
    board::apply(board, Command::GenerateField { bugs }, &mut events);
    events
}

#[test]
fn generated_field_has_unique_in_bounds_cells() {
    for seed in 0..32 {
        let mut board = Board::new(DIMS, CAPACITY, START, seed);
        let events = generate(&mut board, CAPACITY);

        let cells: Vec<GridPoint> = events
            .iter()
            .filter_map(|event| match event {
                Event::BugSpawned { cell } => Some(*cell),
                _ => None,
            })
            .collect();
        assert_eq!(cells.len(), usize::from(CAPACITY));

        for (index, cell) in cells.iter().enumerate() {
            assert!(DIMS.contains(*cell), "seed {seed} placed a bug out of bounds");
            assert!(
                !cells[..index].contains(cell),
                "seed {seed} placed two bugs on one cell"
            );
        }
    }
}

#[test]
fn generation_terminates_for_every_count_up_to_capacity() {
    for bugs in 0..=CAPACITY {
        let mut board = Board::new(DIMS, CAPACITY, START, 7);
        assert_eq!(query::dimensions(&board), DIMS);
        let _ = generate(&mut board, bugs);
        assert_eq!(query::live_remaining(&board), bugs);
    }
}

#[test]
fn regeneration_replaces_the_previous_stage() {
    let mut board = Board::new(DIMS, CAPACITY, START, 11);
    let _ = generate(&mut board, 5);
    let _ = generate(&mut board, 7);
    assert_eq!(query::live_remaining(&board), 7);
    assert_eq!(query::live_cells(&board).len(), 7);
}

#[test]
fn kill_on_a_live_bug_reports_exactly_once() {
    let mut board = Board::new(DIMS, CAPACITY, START, 3);
    let _ = generate(&mut board, 5);
    let target = query::live_cells(&board)[0];

    walk_to(&mut board, target);
    assert!(query::live_bug_at(&board, target));
    let mut events = Vec::new();
    board::apply(&mut board, Command::AttemptKill, &mut events);
    assert_eq!(events, vec![Event::BugKilled { cell: target }]);
    assert_eq!(query::live_remaining(&board), 4);
    assert!(!query::live_bug_at(&board, target));

    // The spot is dead now; a second attempt must not resurrect or re-count.
    events.clear();
    board::apply(&mut board, Command::AttemptKill, &mut events);
    assert!(events.is_empty());
    assert_eq!(query::live_remaining(&board), 4);
}

#[test]
fn kill_on_an_empty_cell_never_mutates_the_field() {
    let mut board = Board::new(DIMS, CAPACITY, START, 3);
    let _ = generate(&mut board, 5);

    let empty = empty_cell(&board);
    walk_to(&mut board, empty);
    let before = query::live_cells(&board);

    let mut events = Vec::new();
    board::apply(&mut board, Command::AttemptKill, &mut events);
    assert!(events.is_empty());
    assert_eq!(query::live_cells(&board), before);
}

#[test]
fn movement_clamps_at_every_matrix_edge() {
    let mut board = Board::new(DIMS, CAPACITY, GridPoint::new(0, 0), 1);
    let mut events = Vec::new();

    board::apply(
        &mut board,
        Command::MoveKiller {
            direction: Direction::North,
        },
        &mut events,
    );
    board::apply(
        &mut board,
        Command::MoveKiller {
            direction: Direction::West,
        },
        &mut events,
    );
    assert_eq!(query::killer(&board), GridPoint::new(0, 0));

    for _ in 0..20 {
        board::apply(
            &mut board,
            Command::MoveKiller {
                direction: Direction::South,
            },
            &mut events,
        );
        board::apply(
            &mut board,
            Command::MoveKiller {
                direction: Direction::East,
            },
            &mut events,
        );
    }
    assert_eq!(
        query::killer(&board),
        GridPoint::new(DIMS.columns() - 1, DIMS.rows() - 1)
    );
}

#[test]
fn moving_off_a_live_bug_keeps_its_cell_lit() {
    let mut board = Board::new(DIMS, CAPACITY, START, 13);
    let _ = generate(&mut board, 5);
    let bug = query::live_cells(&board)[0];
    walk_to(&mut board, bug);

    let direction = if bug.column() == 0 {
        Direction::East
    } else {
        Direction::West
    };
    let mut events = Vec::new();
    board::apply(&mut board, Command::MoveKiller { direction }, &mut events);

    match events.as_slice() {
        [Event::KillerMoved {
            from, vacated_live, ..
        }] => {
            assert_eq!(*from, bug);
            assert!(*vacated_live, "vacating a live bug must keep the cell lit");
        }
        other => panic!("unexpected events: {other:?}"),
    }
}

fn empty_cell(board: &Board) -> GridPoint {
    let live = query::live_cells(board);
    for row in 0..DIMS.rows() {
        for column in 0..DIMS.columns() {
            let candidate = GridPoint::new(column, row);
            if !live.contains(&candidate) {
                return candidate;
            }
        }
    }
    unreachable!("field capacity is far below the cell count");
}

fn walk_to(board: &mut Board, target: GridPoint) {
    let mut events = Vec::new();
    while query::killer(board) != target {
        let killer = query::killer(board);
        let direction = if killer.column() < target.column() {
            Direction::East
        } else if killer.column() > target.column() {
            Direction::West
        } else if killer.row() < target.row() {
            Direction::South
        } else {
            Direction::North
        };
        board::apply(board, Command::MoveKiller { direction }, &mut events);
    }
}
