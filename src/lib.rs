//! Build and solve rectangular grid mazes stored as hexadecimal digit grids
//!
//! Every room of a maze keeps an open/wall state towards its four compass
//! neighbors. A room packs into one hex digit (bit 0 = north, 1 = east,
//! 2 = south, 3 = west; a set bit is a wall), and a maze file holds one
//! line of digits per row. Generated mazes are perfect: the open
//! connections form a spanning tree over the rooms, so exactly one path
//! exists between any two of them.
//!
//! # Examples
//! ```
//! use hexmaze::maze_generator::MazeGenerator;
//! use hexmaze::{Maze, Point, SolveMode};
//!
//! let mut generator = MazeGenerator::new(Some(13));
//! let maze = generator.generate(4, 6).unwrap();
//!
//! // Persist the maze as hex digits and load it back
//! let encoded = maze.to_string();
//! let reloaded = Maze::parse_hex(&encoded, 4, 6).unwrap();
//!
//! let start = Point { row: 0, col: 0 };
//! let goal = Point { row: 3, col: 5 };
//! let solution = reloaded.solve(start, goal, SolveMode::Pruned).unwrap();
//! assert_eq!(solution.cells.first(), Some(&start));
//! assert_eq!(solution.cells.last(), Some(&goal));
//! ```

use std::fmt;

use itertools::Itertools;

pub mod maze_generator;

/// Location in the maze
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct Point {
    pub row: usize,
    pub col: usize,
}

impl fmt::Display for Point {
    /// Path file cell format, `<row>, <col>`
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}, {}", self.row, self.col)
    }
}

/// Compass direction from a room towards one of its neighbors
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Direction {
    North,
    East,
    South,
    West,
}

impl Direction {
    /// All directions, in the canonical north, east, south, west order
    pub const ALL: [Direction; 4] = [
        Direction::North,
        Direction::East,
        Direction::South,
        Direction::West,
    ];

    /// Position of this direction in connection arrays and hex encoding
    pub(crate) fn index(self) -> usize {
        match self {
            Direction::North => 0,
            Direction::East => 1,
            Direction::South => 2,
            Direction::West => 3,
        }
    }

    /// Direction back towards the room the step came from
    pub fn opposite(self) -> Direction {
        match self {
            Direction::North => Direction::South,
            Direction::East => Direction::West,
            Direction::South => Direction::North,
            Direction::West => Direction::East,
        }
    }

    /// Coordinates one step from `from`, or `None` if the step would
    /// leave a `num_rows` x `num_cols` grid.
    pub fn step(self, from: Point, num_rows: usize, num_cols: usize) -> Option<Point> {
        let Point { row, col } = from;
        let stepped = match self {
            Direction::North => Point {
                row: row.checked_sub(1)?,
                col,
            },
            Direction::East => Point { row, col: col + 1 },
            Direction::South => Point { row: row + 1, col },
            Direction::West => Point {
                row,
                col: col.checked_sub(1)?,
            },
        };
        (stepped.row < num_rows && stepped.col < num_cols).then_some(stepped)
    }
}

/// State of one side of a room
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Connection {
    /// Passage to the neighboring room
    Open,
    /// Solid wall
    Wall,
}

/// One room of the maze
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Room {
    /// Side states indexed by direction
    connections: [Connection; 4],
}

impl Room {
    pub(crate) fn new(connections: [Connection; 4]) -> Self {
        Room { connections }
    }

    /// State of the side facing `direction`
    pub fn connection(&self, direction: Direction) -> Connection {
        self.connections[direction.index()]
    }

    /// Whether the side facing `direction` is a passage
    pub fn is_open(&self, direction: Direction) -> bool {
        self.connection(direction) == Connection::Open
    }

    /// Pack the four sides into one lowercase hex digit
    ///
    /// Bit 0 is north, bit 1 east, bit 2 south, bit 3 west; a set bit
    /// means a wall.
    pub fn to_hex_digit(&self) -> char {
        let mut bits = 0;
        for direction in Direction::ALL {
            if self.connection(direction) == Connection::Wall {
                bits |= 1 << direction.index();
            }
        }
        char::from_digit(bits, 16).expect("four connection bits always make a hex digit")
    }

    /// Unpack a hex digit into a room, `None` if `c` is not a hex digit
    pub fn from_hex_digit(c: char) -> Option<Room> {
        let bits = c.to_digit(16)?;
        let mut connections = [Connection::Open; 4];
        for direction in Direction::ALL {
            if bits & (1 << direction.index()) != 0 {
                connections[direction.index()] = Connection::Wall;
            }
        }
        Some(Room { connections })
    }
}

/// Errors reported at the library boundary
///
/// Every error is fatal to the operation that produced it; nothing is
/// retried or partially recovered.
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum MazeError {
    #[error("maze dimensions must be positive, got {num_rows} x {num_cols}")]
    InvalidDimension { num_rows: usize, num_cols: usize },

    #[error("coordinate ({coordinate}) is outside the {num_rows} x {num_cols} maze")]
    OutOfRangeCoordinate {
        coordinate: Point,
        num_rows: usize,
        num_cols: usize,
    },

    #[error("invalid maze character {found:?} at row {row}, column {col}")]
    InvalidDigit { row: usize, col: usize, found: char },

    #[error("maze row {row} has {found} digits, expected {expected}")]
    BadRowLength {
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error("maze has {found} rows, expected {expected}")]
    BadRowCount { expected: usize, found: usize },

    #[error("no path from ({start}) to ({goal})")]
    NoPathFound { start: Point, goal: Point },
}

/// What the solver reports
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum SolveMode {
    /// Every room in visitation order, abandoned dead ends included
    Full,
    /// Only the rooms on the start-to-goal path
    Pruned,
}

impl fmt::Display for SolveMode {
    /// Path file header token
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SolveMode::Full => write!(f, "FULL"),
            SolveMode::Pruned => write!(f, "PRUNED"),
        }
    }
}

/// Solution to a maze
#[derive(Debug)]
pub struct MazeSolution {
    /// Output mode that produced [Self::cells]
    pub mode: SolveMode,
    /// Visited rooms in visitation order (full mode), or the
    /// start-to-goal path (pruned mode)
    pub cells: Vec<Point>,
}

impl fmt::Display for MazeSolution {
    /// Path file format: a `FULL` or `PRUNED` header line, then one
    /// `<row>, <col>` line per cell
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}\n{}", self.mode, self.cells.iter().join("\n"))
    }
}

/// Rectangular grid of rooms
#[derive(Debug)]
pub struct Maze {
    num_rows: usize,
    num_cols: usize,
    /// Rooms in row-major order
    rooms: Vec<Room>,
}

impl Maze {
    pub(crate) fn new(num_rows: usize, num_cols: usize, rooms: Vec<Room>) -> Self {
        debug_assert_eq!(rooms.len(), num_rows * num_cols);
        Maze {
            num_rows,
            num_cols,
            rooms,
        }
    }

    pub fn num_rows(&self) -> usize {
        self.num_rows
    }

    pub fn num_cols(&self) -> usize {
        self.num_cols
    }

    /// Whether (`row`, `col`) is a room of this maze
    pub fn in_range(&self, row: usize, col: usize) -> bool {
        row < self.num_rows && col < self.num_cols
    }

    /// Room at `point`
    ///
    /// # Panics
    /// If `point` is outside the maze.
    pub fn room(&self, point: Point) -> &Room {
        &self.rooms[self.index(point)]
    }

    /// Coordinates of the room one step from `point` towards `direction`
    ///
    /// Callers verify range before stepping; a step that leaves the maze
    /// is a contract violation.
    ///
    /// # Panics
    /// If the step leaves the maze.
    pub fn neighbor(&self, point: Point, direction: Direction) -> Point {
        direction
            .step(point, self.num_rows, self.num_cols)
            .unwrap_or_else(|| {
                panic!("neighbor of ({point}) towards {direction:?} is outside the maze")
            })
    }

    fn index(&self, point: Point) -> usize {
        assert!(
            self.in_range(point.row, point.col),
            "room ({point}) is outside the maze"
        );
        point.row * self.num_cols + point.col
    }

    /// Decode a maze from lines of hex digits
    ///
    /// - `text`: maze file contents, one line of hex digits per row.
    /// - `num_rows`, `num_cols`: expected maze dimensions.
    ///
    /// Returns an error if a dimension is zero, or if `text` does not
    /// hold exactly `num_rows` lines of `num_cols` hex digits each.
    pub fn parse_hex(text: &str, num_rows: usize, num_cols: usize) -> Result<Self, MazeError> {
        if num_rows == 0 || num_cols == 0 {
            return Err(MazeError::InvalidDimension { num_rows, num_cols });
        }

        let lines: Vec<&str> = text.lines().collect();
        if lines.len() != num_rows {
            return Err(MazeError::BadRowCount {
                expected: num_rows,
                found: lines.len(),
            });
        }

        let mut rooms = Vec::with_capacity(num_rows * num_cols);
        for (row, line) in lines.iter().enumerate() {
            let digits: Vec<char> = line.chars().collect();
            if digits.len() != num_cols {
                return Err(MazeError::BadRowLength {
                    row,
                    expected: num_cols,
                    found: digits.len(),
                });
            }
            for (col, c) in digits.into_iter().enumerate() {
                let room =
                    Room::from_hex_digit(c).ok_or(MazeError::InvalidDigit { row, col, found: c })?;
                rooms.push(room);
            }
        }
        Ok(Maze::new(num_rows, num_cols, rooms))
    }

    /// Find a path from `start` to `goal` with depth-first search
    ///
    /// Open connections are explored in the canonical north, east,
    /// south, west order and the search stops at the first route that
    /// reaches the goal. On the spanning trees the generator produces,
    /// that route is the only one.
    ///
    /// The search never bounds-checks a step: an open side facing the
    /// outside of the maze violates the border invariant of the
    /// encoding, and [Self::neighbor] fails fast on it.
    ///
    /// Returns an error if an endpoint is outside the maze or no path
    /// exists.
    pub fn solve(
        &self,
        start: Point,
        goal: Point,
        mode: SolveMode,
    ) -> Result<MazeSolution, MazeError> {
        for coordinate in [start, goal] {
            if !self.in_range(coordinate.row, coordinate.col) {
                return Err(MazeError::OutOfRangeCoordinate {
                    coordinate,
                    num_rows: self.num_rows,
                    num_cols: self.num_cols,
                });
            }
        }

        let mut visited = vec![false; self.rooms.len()];
        // Predecessor of each visited room in the search, for path
        // reconstruction once the goal is found
        let mut parent: Vec<Option<Point>> = vec![None; self.rooms.len()];
        let mut trace = vec![start];
        // Frames of the suspended search: a room and the next direction
        // to try there
        let mut stack: Vec<(Point, usize)> = Vec::new();

        let mut found = start == goal;
        if !found {
            visited[self.index(start)] = true;
            stack.push((start, 0));
        }

        while !found {
            let Some(frame) = stack.last_mut() else {
                return Err(MazeError::NoPathFound { start, goal });
            };
            if frame.1 == Direction::ALL.len() {
                stack.pop();
                continue;
            }
            let current = frame.0;
            let direction = Direction::ALL[frame.1];
            frame.1 += 1;

            if !self.room(current).is_open(direction) {
                continue;
            }
            let next = self.neighbor(current, direction);
            if visited[self.index(next)] {
                continue;
            }
            parent[self.index(next)] = Some(current);
            trace.push(next);
            if next == goal {
                found = true;
            } else {
                visited[self.index(next)] = true;
                stack.push((next, 0));
            }
        }

        let cells = match mode {
            SolveMode::Full => trace,
            SolveMode::Pruned => {
                let mut path = vec![goal];
                let mut current = goal;
                while let Some(previous) = parent[self.index(current)] {
                    path.push(previous);
                    current = previous;
                }
                path.reverse();
                path
            }
        };
        Ok(MazeSolution { mode, cells })
    }
}

impl fmt::Display for Maze {
    /// Maze file format, one line of lowercase hex digits per row
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = self
            .rooms
            .chunks(self.num_cols)
            .map(|row| row.iter().map(Room::to_hex_digit).collect::<String>())
            .join("\n");
        write!(f, "{text}")
    }
}
