mod matchmaking_unit;
